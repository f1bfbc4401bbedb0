use crate::RequestId;

/// Hands out strictly increasing request ids, starting at 1. Owned by a single
/// client connection; ids are never recycled for the lifetime of the instance.
#[derive(Debug)]
pub struct RequestIdGenerator {
    next: RequestId,
}

impl RequestIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn generate(&mut self) -> RequestId {
        let id = self.next;
        self.next = self.next.wrapping_add(1).max(1);
        id
    }

    /// Id the next call to `generate` will return.
    pub fn peek(&self) -> RequestId {
        self.next
    }
}

impl Default for RequestIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
