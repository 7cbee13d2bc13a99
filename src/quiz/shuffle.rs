use rand::seq::SliceRandom;
use rand::Rng;

/// Returns the answers in uniformly random order (Fisher-Yates via
/// `SliceRandom`). The input slice is left alone; the rng is injected so
/// tests can seed it.
pub fn shuffle_answers<R: Rng + ?Sized>(answers: &[String], rng: &mut R) -> Vec<String> {
    let mut shuffled = answers.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Moves every answer equal to the literal "True" to the front, keeping the
/// relative order of everything else. Boolean questions from the trivia API
/// should always read True / False, whatever the shuffle did.
///
/// A stable partition, not a comparator sort, so the ordering guarantee
/// doesn't depend on the sort implementation.
pub fn true_first(answers: Vec<String>) -> Vec<String> {
    let (true_answers, rest): (Vec<String>, Vec<String>) =
        answers.into_iter().partition(|answer| answer == "True");
    true_answers.into_iter().chain(rest).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn answers(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn shuffle_keeps_the_same_multiset() {
        let mut rng = StdRng::seed_from_u64(7);
        let input = answers(&["Paris", "Lyon", "Marseille", "Nice"]);
        for _ in 0..100 {
            let shuffled = shuffle_answers(&input, &mut rng);
            assert_eq!(shuffled.len(), input.len());
            let mut sorted = shuffled.clone();
            sorted.sort();
            let mut expected = input.clone();
            expected.sort();
            assert_eq!(sorted, expected);
        }
    }

    #[test]
    fn shuffle_does_not_mutate_its_input() {
        let mut rng = StdRng::seed_from_u64(7);
        let input = answers(&["A", "B", "C"]);
        let before = input.clone();
        let _ = shuffle_answers(&input, &mut rng);
        assert_eq!(input, before);
    }

    #[test]
    fn shuffle_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(42);
        let input = answers(&["A", "B", "C", "D"]);
        let trials = 8000;
        // counts[element][position]
        let mut counts = [[0usize; 4]; 4];

        for _ in 0..trials {
            let shuffled = shuffle_answers(&input, &mut rng);
            for (position, answer) in shuffled.iter().enumerate() {
                let element = input.iter().position(|a| a == answer).unwrap();
                counts[element][position] += 1;
            }
        }

        // expectation is trials / 4 = 2000 per cell; allow a wide band so the
        // test only catches gross bias
        for row in counts {
            for count in row {
                assert!(
                    (1700..=2300).contains(&count),
                    "position frequency {} too far from uniform",
                    count
                );
            }
        }
    }

    #[test]
    fn true_moves_to_the_front() {
        assert_eq!(
            true_first(answers(&["False", "True"])),
            answers(&["True", "False"])
        );
    }

    #[test]
    fn true_already_first_is_unchanged() {
        assert_eq!(
            true_first(answers(&["True", "False"])),
            answers(&["True", "False"])
        );
    }

    #[test]
    fn no_true_keeps_original_order() {
        let input = answers(&["Paris", "Lyon", "Marseille"]);
        assert_eq!(true_first(input.clone()), input);
    }

    #[test]
    fn multiple_trues_all_move_up_in_order() {
        // malformed input, but the ordering should still be stable
        assert_eq!(
            true_first(answers(&["False", "True", "Maybe", "True"])),
            answers(&["True", "True", "False", "Maybe"])
        );
    }

    #[test]
    fn case_sensitive_match_only() {
        let input = answers(&["false", "true"]);
        assert_eq!(true_first(input.clone()), input);
    }
}
