use crate::id::ObjectId;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("object {0} is not in the scene")]
    UnknownObject(ObjectId),
    #[error("malformed scene snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("unsupported scene snapshot version {0}")]
    UnsupportedVersion(u64),
    #[error("duplicate object id {0} in snapshot")]
    DuplicateId(ObjectId),
}
