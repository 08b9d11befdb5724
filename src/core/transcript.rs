//! # Transcript
//!
//! The ordered list of displayed chat messages. Strictly append-only:
//! entries are never edited, reordered, or removed once pushed. The only way
//! to empty a transcript is to replace it wholesale (see `App::reset`).

/// Who a transcript entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The human typing into the input box.
    User,
    /// The analyst backend's markdown answer.
    Bot,
    /// Non-user, non-model status text (upload progress, errors).
    System,
}

/// One displayed message.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub role: Role,
    pub body: String,
    /// Resolved, cache-busted URL of a plot the backend generated, if any.
    pub image: Option<String>,
}

/// Append-only message log.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push_user(&mut self, body: String) {
        self.entries.push(Entry {
            role: Role::User,
            body,
            image: None,
        });
    }

    pub fn push_bot(&mut self, body: String, image: Option<String>) {
        self.entries.push(Entry {
            role: Role::Bot,
            body,
            image,
        });
    }

    pub fn push_system(&mut self, body: String) {
        self.entries.push(Entry {
            role: Role::System,
            body,
            image: None,
        });
    }
}
