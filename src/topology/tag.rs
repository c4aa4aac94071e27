/// Monotonic integer tag generator.
///
/// Each store owns one counter per entity kind; tags start at 1 and are
/// never handed out twice by the same counter.
#[derive(Debug, Clone)]
pub struct TagCounter {
    next: u32,
}

impl Default for TagCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl TagCounter {
    /// Returns the next tag and advances the counter.
    pub fn next_tag(&mut self) -> u32 {
        let tag = self.next;
        self.next += 1;
        tag
    }

    /// Returns the tag the next call to [`next_tag`](Self::next_tag) will yield.
    #[must_use]
    pub fn peek(&self) -> u32 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_one_and_increments() {
        let mut c = TagCounter::default();
        assert_eq!(c.peek(), 1);
        assert_eq!(c.next_tag(), 1);
        assert_eq!(c.next_tag(), 2);
        assert_eq!(c.peek(), 3);
    }

    #[test]
    fn counters_are_independent() {
        let mut a = TagCounter::default();
        let mut b = TagCounter::default();
        a.next_tag();
        a.next_tag();
        assert_eq!(b.next_tag(), 1);
    }
}
