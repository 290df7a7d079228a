#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Role name the Gemini API expects inside `contents`.
    pub fn gemini_role(&self) -> &'static str {
        match self {
            Role::User => return "user",
            Role::Assistant => return "model",
        }
    }
}
