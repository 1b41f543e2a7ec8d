use super::core::{Language, SnippetTable};
use rand::seq::SliceRandom;
use rand::Rng;

impl SnippetTable {
    /// Pick a snippet for `language` uniformly at random
    pub fn pick<R: Rng + ?Sized>(&self, language: Language, rng: &mut R) -> &str {
        self.snippets(language)
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn create_test_table() -> SnippetTable {
        SnippetTable::new(vec![
            (
                Language::Javascript,
                vec!["let a;".to_string(), "let b;".to_string(), "let c;".to_string()],
            ),
            (Language::Python, vec!["pass".to_string()]),
        ])
        .unwrap()
    }

    #[test]
    fn pick_returns_snippet_of_requested_language() {
        let table = create_test_table();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let snippet = table.pick(Language::Javascript, &mut rng);
            assert!(table.snippets(Language::Javascript).iter().any(|s| s == snippet));
        }
        assert_eq!(table.pick(Language::Python, &mut rng), "pass");
    }

    #[test]
    fn pick_is_reproducible_with_same_seed() {
        let table = create_test_table();
        let mut first = StdRng::seed_from_u64(42);
        let mut second = StdRng::seed_from_u64(42);

        let a: Vec<&str> = (0..10).map(|_| table.pick(Language::Javascript, &mut first)).collect();
        let b: Vec<&str> = (0..10).map(|_| table.pick(Language::Javascript, &mut second)).collect();

        assert_eq!(a, b);
    }

    #[test]
    fn pick_eventually_covers_every_snippet() {
        let table = create_test_table();
        let mut rng = StdRng::seed_from_u64(1);

        let seen: HashSet<&str> = (0..200).map(|_| table.pick(Language::Javascript, &mut rng)).collect();

        assert_eq!(seen.len(), 3);
    }
}
