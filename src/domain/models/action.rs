pub enum Action {
    BackendRequest(TurnRequest),
    CopyCodeBlock(String),
    ListModels(),
}

/// A submitted question tagged with the id of the user message that opened the
/// turn, so a late outcome can be matched to it.
pub struct TurnRequest {
    pub turn_id: String,
    pub text: String,
}
