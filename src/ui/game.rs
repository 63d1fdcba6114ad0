use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cup {
    Red,
    Blue,
    Purple,
    Orange,
    Pink,
    Green,
}

impl Cup {
    pub const PALETTE: [Cup; 6] = [
        Cup::Red,
        Cup::Blue,
        Cup::Purple,
        Cup::Orange,
        Cup::Pink,
        Cup::Green,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Cup::Red => "Red",
            Cup::Blue => "Blue",
            Cup::Purple => "Purple",
            Cup::Orange => "Orange",
            Cup::Pink => "Pink",
            Cup::Green => "Green",
        }
    }

    pub fn image_file(self) -> &'static str {
        match self {
            Cup::Red => "red.png",
            Cup::Blue => "blue.png",
            Cup::Purple => "purple.png",
            Cup::Orange => "orange.png",
            Cup::Pink => "pink.png",
            Cup::Green => "green.png",
        }
    }
}

pub const PALETTE_SIZE: usize = Cup::PALETTE.len();

/// Uniform permutation of the palette (Fisher-Yates via `SliceRandom`).
pub fn generate_secret_order<R: Rng + ?Sized>(rng: &mut R) -> Vec<Cup> {
    let mut cups = Cup::PALETTE.to_vec();
    cups.shuffle(rng);
    cups
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RoundPhase {
    #[default]
    Revealing,
    Shuffling,
    AcceptingInput,
    SubmittedCorrect,
    SubmittedWrong,
}

impl RoundPhase {
    pub fn label(self) -> &'static str {
        match self {
            RoundPhase::Revealing => "Memorize the order",
            RoundPhase::Shuffling => "Shuffling...",
            RoundPhase::AcceptingInput => "Your turn",
            RoundPhase::SubmittedCorrect => "Solved",
            RoundPhase::SubmittedWrong => "Wrong order",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: usize,
    pub fully_correct: bool,
}

pub fn evaluate(guess: &[Cup], secret: &[Cup]) -> Evaluation {
    let correct = guess
        .iter()
        .zip(secret.iter())
        .filter(|(picked, expected)| picked == expected)
        .count();
    Evaluation {
        correct,
        fully_correct: correct == secret.len() && guess.len() == secret.len(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Added { full: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored,
    Incomplete,
    Wrong { correct: usize },
    Correct { elapsed: u32 },
}

#[derive(Clone, Debug)]
pub struct RoundState {
    pub round_id: u64,
    pub phase: RoundPhase,
    pub secret: Vec<Cup>,
    pub display: Vec<Cup>,
    pub guess: Vec<Cup>,
    pub attempts: u32,
    pub correct: usize,
    pub seconds_elapsed: u32,
    pub timer_running: bool,
    pub shuffle_passes_done: u32,
}

impl Default for RoundState {
    fn default() -> Self {
        RoundState::with_secret(Cup::PALETTE.to_vec())
    }
}

impl RoundState {
    pub fn new() -> Self {
        let mut rng = rand::rng();
        RoundState::with_secret(generate_secret_order(&mut rng))
    }

    pub fn with_secret(secret: Vec<Cup>) -> Self {
        RoundState {
            round_id: 0,
            phase: RoundPhase::Revealing,
            display: secret.clone(),
            secret,
            guess: Vec::with_capacity(PALETTE_SIZE),
            attempts: 0,
            correct: 0,
            seconds_elapsed: 0,
            timer_running: true,
            shuffle_passes_done: 0,
        }
    }

    pub fn reset(&mut self) {
        let mut rng = rand::rng();
        self.reset_with(&mut rng);
    }

    pub fn reset_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let round_id = self.round_id.wrapping_add(1);
        *self = RoundState::with_secret(generate_secret_order(rng));
        self.round_id = round_id;
    }

    /// Invalidates every callback armed for the current round.
    pub fn discard(&mut self) {
        self.round_id = self.round_id.wrapping_add(1);
        self.timer_running = false;
        self.phase = RoundPhase::Revealing;
        self.guess.clear();
    }

    pub fn accepts_input(&self) -> bool {
        self.phase == RoundPhase::AcceptingInput
    }

    pub fn begin_shuffle(&mut self) -> bool {
        if self.phase != RoundPhase::Revealing {
            return false;
        }
        self.phase = RoundPhase::Shuffling;
        self.shuffle_passes_done = 0;
        true
    }

    /// Re-permutes the display copy once. Returns true when the last pass ran
    /// and the round switched to accepting input.
    pub fn shuffle_display<R: Rng + ?Sized>(&mut self, rng: &mut R, passes: u32) -> bool {
        if self.phase != RoundPhase::Shuffling {
            return false;
        }
        self.display.shuffle(rng);
        self.shuffle_passes_done = self.shuffle_passes_done.saturating_add(1);
        if self.shuffle_passes_done >= passes {
            self.finish_shuffle();
            return true;
        }
        false
    }

    pub fn finish_shuffle(&mut self) {
        if matches!(self.phase, RoundPhase::Revealing | RoundPhase::Shuffling) {
            self.phase = RoundPhase::AcceptingInput;
        }
    }

    pub fn is_full(&self) -> bool {
        self.guess.len() >= PALETTE_SIZE
    }

    pub fn click(&mut self, cup: Cup) -> ClickOutcome {
        if !self.accepts_input() || self.is_full() {
            return ClickOutcome::Ignored;
        }
        self.guess.push(cup);
        ClickOutcome::Added {
            full: self.is_full(),
        }
    }

    pub fn undo(&mut self) -> Option<Cup> {
        if !self.accepts_input() {
            return None;
        }
        self.guess.pop()
    }

    pub fn clear(&mut self) {
        self.guess.clear();
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        if !self.accepts_input() {
            return SubmitOutcome::Ignored;
        }
        if !self.is_full() {
            return SubmitOutcome::Incomplete;
        }

        self.attempts = self.attempts.saturating_add(1);
        let evaluation = evaluate(&self.guess, &self.secret);
        self.correct = evaluation.correct;

        if evaluation.fully_correct {
            self.timer_running = false;
            self.phase = RoundPhase::SubmittedCorrect;
            SubmitOutcome::Correct {
                elapsed: self.seconds_elapsed,
            }
        } else {
            self.clear();
            self.phase = RoundPhase::SubmittedWrong;
            SubmitOutcome::Wrong {
                correct: evaluation.correct,
            }
        }
    }

    pub fn acknowledge_wrong(&mut self) {
        if self.phase == RoundPhase::SubmittedWrong {
            self.phase = RoundPhase::AcceptingInput;
        }
    }

    pub fn tick(&mut self) -> bool {
        if !self.timer_running {
            return false;
        }
        self.seconds_elapsed = self.seconds_elapsed.saturating_add(1);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SECRET: [Cup; 6] = [
        Cup::Red,
        Cup::Blue,
        Cup::Purple,
        Cup::Orange,
        Cup::Pink,
        Cup::Green,
    ];

    fn playing_round() -> RoundState {
        let mut round = RoundState::with_secret(SECRET.to_vec());
        assert!(round.begin_shuffle());
        round.finish_shuffle();
        round
    }

    fn is_permutation(order: &[Cup]) -> bool {
        order.len() == PALETTE_SIZE && Cup::PALETTE.iter().all(|cup| order.contains(cup))
    }

    #[test]
    fn secret_order_is_always_a_palette_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            assert!(is_permutation(&generate_secret_order(&mut rng)));
        }
    }

    #[test]
    fn reset_generates_a_new_permutation_and_bumps_round_id() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut round = playing_round();
        round.click(Cup::Red);
        round.attempts = 3;
        round.seconds_elapsed = 40;
        let previous_id = round.round_id;

        round.reset_with(&mut rng);

        assert!(is_permutation(&round.secret));
        assert_eq!(round.display, round.secret);
        assert!(round.guess.is_empty());
        assert_eq!(round.attempts, 0);
        assert_eq!(round.seconds_elapsed, 0);
        assert_eq!(round.phase, RoundPhase::Revealing);
        assert!(round.timer_running);
        assert_eq!(round.round_id, previous_id + 1);
    }

    #[test]
    fn shuffle_keeps_secret_and_enables_input_after_last_pass() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut round = RoundState::with_secret(SECRET.to_vec());
        assert!(round.begin_shuffle());
        for _ in 0..4 {
            assert!(!round.shuffle_display(&mut rng, 5));
            assert_eq!(round.phase, RoundPhase::Shuffling);
            assert!(is_permutation(&round.display));
        }
        assert!(round.shuffle_display(&mut rng, 5));
        assert_eq!(round.phase, RoundPhase::AcceptingInput);
        assert_eq!(round.secret, SECRET.to_vec());
    }

    #[test]
    fn clicks_are_ignored_until_input_is_enabled() {
        let mut round = RoundState::with_secret(SECRET.to_vec());
        assert_eq!(round.click(Cup::Red), ClickOutcome::Ignored);
        round.begin_shuffle();
        assert_eq!(round.click(Cup::Red), ClickOutcome::Ignored);
        assert!(round.guess.is_empty());
    }

    #[test]
    fn guess_never_exceeds_palette_size() {
        let mut round = playing_round();
        for i in 0..50 {
            round.click(Cup::PALETTE[i % PALETTE_SIZE]);
            assert!(round.guess.len() <= PALETTE_SIZE);
        }
        assert_eq!(round.guess.len(), PALETTE_SIZE);
        assert_eq!(round.click(Cup::Red), ClickOutcome::Ignored);
    }

    #[test]
    fn click_reports_when_guess_becomes_full() {
        let mut round = playing_round();
        for cup in &SECRET[..5] {
            assert_eq!(round.click(*cup), ClickOutcome::Added { full: false });
        }
        assert_eq!(round.click(Cup::Green), ClickOutcome::Added { full: true });
        assert_eq!(round.phase, RoundPhase::AcceptingInput);
    }

    #[test]
    fn undo_on_empty_guess_is_a_noop_and_clear_empties() {
        let mut round = playing_round();
        assert_eq!(round.undo(), None);
        assert!(round.guess.is_empty());

        round.click(Cup::Pink);
        round.click(Cup::Blue);
        round.clear();
        assert!(round.guess.is_empty());
        round.clear();
        assert!(round.guess.is_empty());
    }

    #[test]
    fn evaluation_counts_matching_positions() {
        let guess = [
            Cup::Blue,
            Cup::Red,
            Cup::Purple,
            Cup::Orange,
            Cup::Pink,
            Cup::Green,
        ];
        assert_eq!(
            evaluate(&guess, &SECRET),
            Evaluation {
                correct: 4,
                fully_correct: false
            }
        );
        assert_eq!(
            evaluate(&SECRET, &SECRET),
            Evaluation {
                correct: 6,
                fully_correct: true
            }
        );
        let reversed: Vec<Cup> = SECRET.iter().rev().copied().collect();
        assert_eq!(evaluate(&reversed, &SECRET).correct, 0);
    }

    #[test]
    fn incomplete_submit_mutates_nothing() {
        let mut round = playing_round();
        round.click(Cup::Red);
        round.click(Cup::Blue);
        assert_eq!(round.submit(), SubmitOutcome::Incomplete);
        assert_eq!(round.attempts, 0);
        assert_eq!(round.guess, vec![Cup::Red, Cup::Blue]);
        assert_eq!(round.phase, RoundPhase::AcceptingInput);
    }

    #[test]
    fn submit_is_ignored_outside_accepting_input() {
        let mut round = RoundState::with_secret(SECRET.to_vec());
        assert_eq!(round.submit(), SubmitOutcome::Ignored);
        assert_eq!(round.attempts, 0);
    }

    #[test]
    fn scenario_a_correct_guess_stops_the_timer() {
        let mut round = playing_round();
        round.tick();
        round.tick();
        for cup in SECRET {
            round.click(cup);
        }

        assert_eq!(round.submit(), SubmitOutcome::Correct { elapsed: 2 });
        assert_eq!(round.correct, 6);
        assert_eq!(round.attempts, 1);
        assert!(!round.timer_running);
        assert!(!round.tick());
        assert_eq!(round.seconds_elapsed, 2);
        assert_eq!(round.phase, RoundPhase::SubmittedCorrect);
        assert_eq!(round.click(Cup::Red), ClickOutcome::Ignored);
        assert_eq!(round.submit(), SubmitOutcome::Ignored);
        assert_eq!(round.attempts, 1);
    }

    #[test]
    fn scenario_b_wrong_guess_clears_and_keeps_timing() {
        let mut round = playing_round();
        for cup in [
            Cup::Blue,
            Cup::Red,
            Cup::Purple,
            Cup::Orange,
            Cup::Pink,
            Cup::Green,
        ] {
            round.click(cup);
        }

        assert_eq!(round.submit(), SubmitOutcome::Wrong { correct: 4 });
        assert_eq!(round.correct, 4);
        assert_eq!(round.attempts, 1);
        assert!(round.guess.is_empty());
        assert!(round.timer_running);
        assert!(round.tick());
        assert_eq!(round.phase, RoundPhase::SubmittedWrong);

        round.acknowledge_wrong();
        assert_eq!(round.phase, RoundPhase::AcceptingInput);
        assert_eq!(round.click(Cup::Red), ClickOutcome::Added { full: false });
    }

    #[test]
    fn scenario_d_repeated_undo_empties_a_full_guess() {
        let mut round = playing_round();
        for cup in SECRET {
            round.click(cup);
        }
        for expected in SECRET.iter().rev() {
            assert_eq!(round.undo(), Some(*expected));
        }
        assert!(round.guess.is_empty());
        assert_eq!(round.undo(), None);
        assert!(round.guess.is_empty());
    }

    #[test]
    fn discard_stops_timer_and_invalidates_round() {
        let mut round = playing_round();
        let id = round.round_id;
        round.discard();
        assert_ne!(round.round_id, id);
        assert!(!round.tick());
        assert!(!round.accepts_input());
        assert_eq!(round.click(SECRET[0]), ClickOutcome::Ignored);
        assert_eq!(round.submit(), SubmitOutcome::Ignored);
    }
}
