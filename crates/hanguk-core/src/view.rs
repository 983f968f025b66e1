use hanguk_types::{DictionaryEntry, EntryImages, RequestId, ViewTicket};

/// The entry on screen and the bookkeeping that keeps late results off it.
///
/// Every lookup takes a [`RequestId`]; only the most recent one may be shown.
/// Showing an entry starts a new generation and hands out a [`ViewTicket`]
/// that enrichment must present to touch the entry.
#[derive(Debug, Default)]
pub struct EntryView {
    current: Option<DictionaryEntry>,
    generation: u64,
    next_request: RequestId,
    latest_request: Option<RequestId>,
}

impl EntryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_request(&mut self) -> RequestId {
        self.next_request += 1;
        self.latest_request = Some(self.next_request);
        self.next_request
    }

    pub fn is_latest(&self, request: RequestId) -> bool {
        self.latest_request == Some(request)
    }

    /// Display the result of `request`, unless a newer request superseded it
    pub fn show(&mut self, request: RequestId, entry: DictionaryEntry) -> Option<ViewTicket> {
        if !self.is_latest(request) {
            tracing::debug!("Dropping result of superseded request {}", request);
            return None;
        }

        self.generation += 1;
        let ticket = ViewTicket {
            generation: self.generation,
            word: entry.word.clone(),
        };
        self.current = Some(entry);
        Some(ticket)
    }

    /// The latest request failed: nothing is shown and every outstanding
    /// ticket goes stale. Returns false for a superseded request.
    pub fn fail(&mut self, request: RequestId) -> bool {
        if !self.is_latest(request) {
            return false;
        }

        self.current = None;
        self.generation += 1;
        self.latest_request = None;
        true
    }

    /// Merge images into the entry the ticket was issued for. Returns false
    /// if that entry is no longer on screen.
    pub fn apply_enrichment(&mut self, ticket: &ViewTicket, images: EntryImages) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        match self.current.as_mut() {
            Some(entry) if entry.word == ticket.word => {
                entry.merge_images(images);
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&DictionaryEntry> {
        self.current.as_ref()
    }

    /// Forget the entry and every outstanding request and ticket
    pub fn clear(&mut self) {
        self.current = None;
        self.generation += 1;
        self.latest_request = None;
    }
}
