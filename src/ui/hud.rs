use std::cell::RefCell;
use std::rc::Rc;

use gtk4::glib;
use gtk4::prelude::*;

use super::highscore::HighScore;
use super::state::AppState;

pub fn format_mm_ss(total_secs: u32) -> String {
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}", mins, secs)
}

pub fn format_best(best: HighScore) -> String {
    match best.seconds() {
        Some(secs) => format_mm_ss(secs),
        None => "--:--".to_string(),
    }
}

pub(super) fn update_subtitle(st: &AppState) {
    if let Some(subtitle) = &st.title_game_subtitle {
        subtitle.set_text(st.round.phase.label());
    }
}

pub(super) fn update_timer_label(st: &AppState) {
    if let Some(label) = &st.timer_label {
        label.set_text(&format!("Time: {}", format_mm_ss(st.round.seconds_elapsed)));
    }
}

pub(super) fn update_stats(st: &AppState) {
    update_timer_label(st);
    update_subtitle(st);
    if let Some(label) = &st.correct_label {
        label.set_text(&format!("{} Correct", st.round.correct));
    }
    if let Some(label) = &st.attempts_label {
        label.set_text(&format!("Attempts: {}", st.round.attempts));
    }
    update_high_score_labels(st);
}

pub(super) fn update_high_score_labels(st: &AppState) {
    let best = format_best(st.high_score);
    if let Some(label) = &st.high_score_label {
        label.set_text(&format!("High Score: {}", best));
    }
    if let Some(label) = &st.home_best_label {
        label.set_text(&format!("Best time: {}", best));
    }
}

pub(super) fn update_controls(st: &AppState) {
    let accepting = st.round.accepts_input();
    if let Some(button) = &st.undo_button {
        button.set_sensitive(accepting);
    }
    if let Some(button) = &st.submit_button {
        button.set_sensitive(accepting);
    }
    if let Some(panel) = &st.buttons_panel {
        panel.set_sensitive(accepting);
    }
}

pub(super) fn stop_timer(st: &mut AppState) {
    if let Some(handle) = st.timer_handle.take() {
        handle.remove();
    }
}

pub(super) fn stop_round_animations(st: &mut AppState) {
    if let Some(handle) = st.reveal_handle.take() {
        handle.remove();
    }
    if let Some(handle) = st.shuffle_handle.take() {
        handle.remove();
    }
}

pub(super) fn stop_star_flash(st: &mut AppState) {
    if let Some(handle) = st.star_handle.take() {
        handle.remove();
    }
    if let Some(stars) = &st.victory_stars_label {
        stars.set_opacity(1.0);
    }
}

pub(super) fn start_timer(state: &Rc<RefCell<AppState>>) {
    let mut st = state.borrow_mut();
    stop_timer(&mut st);
    update_timer_label(&st);

    let round_id = st.round.round_id;
    let state_tick = state.clone();
    let handle = glib::timeout_add_local(st.config.tick_interval(), move || {
        let mut st = state_tick.borrow_mut();
        if st.round.round_id != round_id || !st.round.tick() {
            st.timer_handle = None;
            return glib::ControlFlow::Break;
        }
        update_timer_label(&st);
        glib::ControlFlow::Continue
    });
    st.timer_handle = Some(handle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(59), "00:59");
        assert_eq!(format_mm_ss(61), "01:01");
        assert_eq!(format_mm_ss(3600), "60:00");
    }

    #[test]
    fn unset_best_formats_as_dashes() {
        assert_eq!(format_best(HighScore::UNSET), "--:--");
        assert_eq!(format_best(HighScore::new(45)), "00:45");
    }
}
