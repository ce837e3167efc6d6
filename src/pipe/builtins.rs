use crate::pipe::{Pipe, PipeError, PipeResult};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

/// A pipe that parses a path segment into a document id
#[derive(Default)]
pub struct ParseObjectIdPipe;

#[async_trait]
impl Pipe for ParseObjectIdPipe {
    type Input = String;
    type Output = ObjectId;

    async fn transform(&self, input: String) -> PipeResult<ObjectId> {
        ObjectId::parse_str(&input).map_err(|_| PipeError::Cast {
            value: input,
            path: "_id".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_parses_hex_id() {
        let id = ObjectId::new();
        let parsed = ParseObjectIdPipe.transform(id.to_hex()).await.unwrap();
        assert_eq!(parsed, id);
    }

    #[tokio::test]
    async fn test_rejects_malformed_id() {
        let err = ParseObjectIdPipe.transform("not-an-id".to_string()).await.unwrap_err();
        let PipeError::Cast { value, path } = err;
        assert_eq!(value, "not-an-id");
        assert_eq!(path, "_id");
    }
}
