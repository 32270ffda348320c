use serde::{Deserialize, Serialize};

use crate::domain::UserRecord;

/// Editable fields of a user record. Used by the form layer to address a
/// single field per change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Name,
    Tel,
    Address,
    Intro,
}

impl UserField {
    pub const ALL: [UserField; 4] = [
        UserField::Name,
        UserField::Tel,
        UserField::Address,
        UserField::Intro,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UserField::Name => "Name",
            UserField::Tel => "Telephone",
            UserField::Address => "Address",
            UserField::Intro => "Introduction",
        }
    }
}

/// Request body for create and update calls. Field names match the wire
/// format exactly; the identifier is never part of the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub tel: String,
    pub address: String,
    pub intro: String,
}

impl UserDraft {
    /// Replace exactly one field's value, leaving the others untouched.
    pub fn set(&mut self, field: UserField, value: impl Into<String>) {
        let value = value.into();
        match field {
            UserField::Name => self.name = value,
            UserField::Tel => self.tel = value,
            UserField::Address => self.address = value,
            UserField::Intro => self.intro = value,
        }
    }

    pub fn get(&self, field: UserField) -> &str {
        match field {
            UserField::Name => &self.name,
            UserField::Tel => &self.tel,
            UserField::Address => &self.address,
            UserField::Intro => &self.intro,
        }
    }

    /// In-place binding for immediate-mode text widgets.
    pub fn get_mut(&mut self, field: UserField) -> &mut String {
        match field {
            UserField::Name => &mut self.name,
            UserField::Tel => &mut self.tel,
            UserField::Address => &mut self.address,
            UserField::Intro => &mut self.intro,
        }
    }

    /// Fields that are still blank. All four are required at submission time;
    /// no format validation beyond that.
    pub fn missing_fields(&self) -> Vec<UserField> {
        UserField::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }
}

impl From<&UserRecord> for UserDraft {
    fn from(record: &UserRecord) -> Self {
        Self {
            name: record.name.clone(),
            tel: record.tel.clone(),
            address: record.address.clone(),
            intro: record.intro.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub success: bool,
}
