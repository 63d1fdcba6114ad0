use gtk4 as gtk;
use libadwaita as adw;

use super::config::GameConfig;
use super::game::{Cup, RoundState, SubmitOutcome};
use super::highscore::{self, HighScore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitReport {
    pub outcome: SubmitOutcome,
    pub new_best: bool,
}

pub struct AppState {
    pub window: Option<adw::ApplicationWindow>,
    pub view_stack: Option<gtk::Stack>,
    pub back_button: Option<gtk::Button>,
    pub reset_header_button: Option<gtk::Button>,
    pub title_game_subtitle: Option<gtk::Label>,
    pub home_best_label: Option<gtk::Label>,
    pub timer_label: Option<gtk::Label>,
    pub correct_label: Option<gtk::Label>,
    pub attempts_label: Option<gtk::Label>,
    pub high_score_label: Option<gtk::Label>,
    pub display_panel: Option<gtk::Box>,
    pub buttons_panel: Option<gtk::Box>,
    pub guess_panel: Option<gtk::Box>,
    pub cup_buttons: Vec<(Cup, gtk::Button)>,
    pub undo_button: Option<gtk::Button>,
    pub submit_button: Option<gtk::Button>,
    pub victory_stats_label: Option<gtk::Label>,
    pub victory_best_label: Option<gtk::Label>,
    pub victory_stars_label: Option<gtk::Label>,

    // Game state
    pub config: GameConfig,
    pub round: RoundState,
    pub high_score: HighScore,
    pub timer_handle: Option<glib::SourceId>,
    pub reveal_handle: Option<glib::SourceId>,
    pub shuffle_handle: Option<glib::SourceId>,
    pub star_handle: Option<glib::SourceId>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            window: None,
            view_stack: None,
            back_button: None,
            reset_header_button: None,
            title_game_subtitle: None,
            home_best_label: None,
            timer_label: None,
            correct_label: None,
            attempts_label: None,
            high_score_label: None,
            display_panel: None,
            buttons_panel: None,
            guess_panel: None,
            cup_buttons: Vec::new(),
            undo_button: None,
            submit_button: None,
            victory_stats_label: None,
            victory_best_label: None,
            victory_stars_label: None,
            config: GameConfig::default(),
            round: RoundState::default(),
            high_score: HighScore::UNSET,
            timer_handle: None,
            reveal_handle: None,
            shuffle_handle: None,
            star_handle: None,
        }
    }
}

impl AppState {
    pub fn new(config: GameConfig) -> Self {
        let high_score = highscore::load_or_unset(&config.high_score_path);
        AppState {
            config,
            high_score,
            round: RoundState::new(),
            ..Self::default()
        }
    }

    pub fn start_round(&mut self) {
        self.round.reset();
        tracing::debug!(
            round = self.round.round_id,
            secret = ?self.round.secret,
            "correct order (hidden)"
        );
    }

    /// Evaluates the guess and, on a win, records and persists a faster time.
    pub fn submit(&mut self) -> SubmitReport {
        let outcome = self.round.submit();
        let mut new_best = false;
        match outcome {
            SubmitOutcome::Correct { elapsed } => {
                tracing::info!(
                    elapsed,
                    attempts = self.round.attempts,
                    "round solved"
                );
                if self.high_score.record(elapsed) {
                    new_best = true;
                    if let Err(err) = highscore::save(&self.config.high_score_path, elapsed) {
                        tracing::warn!(%err, "high score kept in memory only");
                    } else {
                        tracing::info!(best = elapsed, "new high score saved");
                    }
                }
            }
            SubmitOutcome::Wrong { correct } => {
                tracing::info!(correct, attempts = self.round.attempts, "wrong order");
            }
            SubmitOutcome::Incomplete | SubmitOutcome::Ignored => {}
        }
        SubmitReport { outcome, new_best }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use temp_dir::TempDir;

    fn state_in(dir: &TempDir) -> AppState {
        let config = GameConfig {
            high_score_path: dir.child("highscore.txt"),
            ..GameConfig::default()
        };
        AppState::new(config)
    }

    fn solve_in(st: &mut AppState, seconds: u32) -> SubmitReport {
        st.round = RoundState::with_secret(Cup::PALETTE.to_vec());
        st.round.begin_shuffle();
        st.round.finish_shuffle();
        for _ in 0..seconds {
            st.round.tick();
        }
        for cup in Cup::PALETTE {
            st.round.click(cup);
        }
        st.submit()
    }

    #[test]
    fn scenario_c_only_faster_rounds_are_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("highscore.txt");
        fs::write(&path, "45").unwrap();

        let mut st = state_in(&dir);
        assert_eq!(st.high_score, HighScore::new(45));

        let report = solve_in(&mut st, 30);
        assert_eq!(report.outcome, SubmitOutcome::Correct { elapsed: 30 });
        assert!(report.new_best);
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "30");

        let report = solve_in(&mut st, 50);
        assert_eq!(report.outcome, SubmitOutcome::Correct { elapsed: 50 });
        assert!(!report.new_best);
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "30");
        assert_eq!(st.high_score, HighScore::new(30));
    }

    #[test]
    fn first_win_without_file_sets_high_score() {
        let dir = TempDir::new().unwrap();
        let mut st = state_in(&dir);
        assert_eq!(st.high_score, HighScore::UNSET);

        let report = solve_in(&mut st, 12);
        assert!(report.new_best);
        assert_eq!(
            fs::read_to_string(dir.child("highscore.txt")).unwrap(),
            "12\n"
        );
    }

    #[test]
    fn unwritable_path_keeps_score_in_memory() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.child("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let config = GameConfig {
            high_score_path: blocker.join("highscore.txt"),
            ..GameConfig::default()
        };
        let mut st = AppState::new(config);

        let report = solve_in(&mut st, 20);
        assert!(report.new_best);
        assert_eq!(st.high_score, HighScore::new(20));
    }

    #[test]
    fn start_round_rearms_the_round() {
        let mut st = AppState::default();
        let id = st.round.round_id;
        st.start_round();
        assert_eq!(st.round.round_id, id + 1);
        assert!(st.round.guess.is_empty());
    }
}
