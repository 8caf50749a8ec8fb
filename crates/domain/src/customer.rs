use crate::shared::entity::{Entity, ID};

/// The owner of a `Cart` and the recipient of its reminder emails.
/// Account management lives in another service, this is only the
/// slice of the customer document the mailer needs.
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: ID,
    pub username: String,
    pub email: String,
}

impl Customer {
    pub fn new(username: &str, email: &str) -> Self {
        Self {
            id: Default::default(),
            username: username.into(),
            email: email.into(),
        }
    }
}

impl Entity for Customer {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
