mod sanitize;
mod stager;
mod storage;

pub use sanitize::*;
pub use stager::{StagedAttachment, UploadStager};
pub use storage::{LocalUploadStorage, UploadStorage};
