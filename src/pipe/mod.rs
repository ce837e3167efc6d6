use async_trait::async_trait;

pub mod builtins;

pub type PipeResult<T> = Result<T, PipeError>;

#[derive(Debug, thiserror::Error)]
pub enum PipeError {
    #[error("Cast failed for value \"{value}\" at path \"{path}\"")]
    Cast { value: String, path: String },
}

/// The Pipe trait for transforming raw request input before it reaches a service
#[async_trait]
pub trait Pipe: Send + Sync + 'static {
    type Input: Send + 'static;
    type Output: Send + 'static;

    async fn transform(&self, input: Self::Input) -> PipeResult<Self::Output>;
}
