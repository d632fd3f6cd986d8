use crate::model::CursorArtifact;

#[derive(Clone, Debug)]
pub enum SplitMsg {
    Started(usize),
    Progress(usize, usize),
    Completed(Vec<CursorArtifact>),
    Failed(String),
    LogMessage(String),
}
