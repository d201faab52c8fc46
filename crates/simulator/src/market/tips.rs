use kirana_core::{Timestamp, Tip, TipKind, TipTemplate};

/// Round-robin issuer over a fixed pool of insight templates
///
/// Back-to-back repeats of the same (kind, message) are re-rolled, at most
/// `2 × pool size` draws per tip. Only the previous tip is compared; older
/// history may repeat.
#[derive(Debug, Clone)]
pub struct TipRotator {
    pool: Vec<TipTemplate>,
    /// Next pool position to draw
    cursor: usize,
    /// (kind, message) of the last issued tip
    last_key: Option<(TipKind, String)>,
    /// Tips issued so far; feeds the identifier
    issued: u64,
}

impl TipRotator {
    pub fn new(pool: Vec<TipTemplate>) -> Self {
        Self {
            pool,
            cursor: 0,
            last_key: None,
            issued: 0,
        }
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Draw the next template, skipping an immediate repeat when possible
    pub fn next_template(&mut self) -> Option<&TipTemplate> {
        let len = self.pool.len();
        if len == 0 {
            return None;
        }

        let max_attempts = len * 2;
        let mut attempts = 0;
        let index = loop {
            let index = self.cursor % len;
            self.cursor = self.cursor.wrapping_add(1);
            attempts += 1;

            let repeat = self
                .last_key
                .as_ref()
                .is_some_and(|(kind, message)| self.pool[index].key() == (*kind, message.as_str()));
            if !repeat || len == 1 || attempts >= max_attempts {
                break index;
            }
        };

        let template = &self.pool[index];
        self.last_key = Some((template.kind, template.message.clone()));
        Some(template)
    }

    /// Issue a stamped tip, `None` if the pool is empty
    pub fn issue(&mut self, now: Timestamp) -> Option<Tip> {
        let template = self.next_template()?.clone();
        self.issued += 1;
        let id = format!("tip-{}-{}", self.issued, now.timestamp_millis());
        Some(Tip::from_template(&template, id, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kirana_core::Urgency;

    fn template(kind: TipKind, message: &str) -> TipTemplate {
        TipTemplate::new(kind, message, Urgency::Low)
    }

    #[test]
    fn test_round_robin_order() {
        let mut rotator = TipRotator::new(vec![
            template(TipKind::Restock, "a"),
            template(TipKind::Swap, "b"),
            template(TipKind::Alert, "c"),
        ]);

        let drawn: Vec<String> = (0..5)
            .map(|_| rotator.next_template().unwrap().message.clone())
            .collect();

        assert_eq!(drawn, vec!["a", "b", "c", "a", "b"]);
    }

    #[test]
    fn test_skips_adjacent_duplicate() {
        let mut rotator = TipRotator::new(vec![
            template(TipKind::Alert, "same"),
            template(TipKind::Alert, "same"),
            template(TipKind::Forecast, "other"),
        ]);

        let first = rotator.next_template().unwrap().message.clone();
        let second = rotator.next_template().unwrap().message.clone();

        assert_eq!(first, "same");
        assert_eq!(second, "other");
    }

    #[test]
    fn test_same_message_different_kind_is_not_a_repeat() {
        let mut rotator = TipRotator::new(vec![
            template(TipKind::Alert, "stock"),
            template(TipKind::Forecast, "stock"),
        ]);

        assert_eq!(rotator.next_template().unwrap().kind, TipKind::Alert);
        assert_eq!(rotator.next_template().unwrap().kind, TipKind::Forecast);
    }

    #[test]
    fn test_uniform_pool_gives_up_and_repeats() {
        let mut rotator = TipRotator::new(vec![
            template(TipKind::Alert, "only"),
            template(TipKind::Alert, "only"),
        ]);

        assert!(rotator.next_template().is_some());
        // Every re-roll matches; after 2 × pool size draws the repeat is accepted
        assert_eq!(rotator.next_template().unwrap().message, "only");
        assert_eq!(rotator.cursor, 1 + 4);
    }

    #[test]
    fn test_single_entry_pool_repeats() {
        let mut rotator = TipRotator::new(vec![template(TipKind::Swap, "solo")]);

        assert!(rotator.next_template().is_some());
        assert!(rotator.next_template().is_some());
        assert_eq!(rotator.cursor, 2);
    }

    #[test]
    fn test_empty_pool() {
        let mut rotator = TipRotator::new(Vec::new());
        assert!(rotator.issue(Utc::now()).is_none());
        assert_eq!(rotator.issued(), 0);
    }

    #[test]
    fn test_issue_stamps_identifier() {
        let mut rotator = TipRotator::new(vec![template(TipKind::Restock, "a")]);
        let now = Utc::now();

        let tip = rotator.issue(now).unwrap();

        assert_eq!(tip.id, format!("tip-1-{}", now.timestamp_millis()));
        assert_eq!(tip.created_at, now);
        assert_eq!(rotator.issued(), 1);
    }
}
