use crate::core::rules::RuleKind;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// 遞迴列出 `dir` 底下指定副檔名的檔案
    fn list_files(
        &self,
        dir: &str,
        extension: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn root(&self) -> &str;
    fn extension(&self) -> &str;
    fn dry_run(&self) -> bool;
    fn disabled_rules(&self) -> Result<Vec<RuleKind>>;
    fn default_version(&self) -> Result<(u64, u64, u64)>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;
    type Transformed: Send;
    type Summary: Send;

    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, input: Self::Extracted) -> Result<Self::Transformed>;
    async fn load(&self, output: Self::Transformed) -> Result<Self::Summary>;
}
