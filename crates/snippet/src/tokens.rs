/// Token counting capability
///
/// Any `Fn(&str) -> usize` works, so callers with a real tokenizer can pass
/// a closure.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count(&self, text: &str) -> usize {
        self(text)
    }
}

/// Default estimate: 4 bytes per token on average for code
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteEstimate;

impl TokenCounter for ByteEstimate {
    fn count(&self, text: &str) -> usize {
        text.len() / 4
    }
}
