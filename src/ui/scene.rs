use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;

use super::hud::{
    format_mm_ss,
    stop_round_animations,
    stop_star_flash,
    stop_timer,
    update_high_score_labels,
};
use super::state::AppState;

fn set_header_buttons(st: &AppState, back_visible: bool, reset_visible: bool) {
    if let Some(back) = &st.back_button {
        back.set_visible(back_visible);
    }
    if let Some(reset) = &st.reset_header_button {
        reset.set_visible(reset_visible);
    }
    if let Some(subtitle) = &st.title_game_subtitle {
        subtitle.set_visible(reset_visible);
    }
}

fn switch_page(st: &AppState, page: &str, transition: gtk::StackTransitionType) {
    if let Some(stack) = &st.view_stack {
        stack.set_transition_type(transition);
        stack.set_visible_child_name(page);
    }
}

pub(super) fn visible_page(st: &AppState) -> Option<glib::GString> {
    st.view_stack.as_ref().and_then(|stack| stack.visible_child_name())
}

pub(super) fn show_game_page(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    set_header_buttons(&st, true, true);
    switch_page(&st, "game", gtk::StackTransitionType::SlideLeft);
}

/// Stops every timer and drops the round; the next Start builds a new one.
pub(super) fn show_home(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        stop_timer(&mut st);
        stop_round_animations(&mut st);
        stop_star_flash(&mut st);
        st.round.discard();
        update_high_score_labels(&st);
    }
    let st = state.borrow();
    set_header_buttons(&st, false, false);
    switch_page(&st, "home", gtk::StackTransitionType::SlideRight);
}

pub(super) fn show_victory(state: &Rc<RefCell<AppState>>, new_best: bool) {
    {
        let st = state.borrow();
        if let Some(label) = &st.victory_stats_label {
            label.set_text(&format!(
                "Time: {}\nAttempts: {}",
                format_mm_ss(st.round.seconds_elapsed),
                st.round.attempts
            ));
        }
        if let Some(label) = &st.victory_best_label {
            label.set_visible(new_best);
        }
        set_header_buttons(&st, true, false);
        switch_page(&st, "victory", gtk::StackTransitionType::SlideLeft);
    }
    start_star_flash(state);
}

fn start_star_flash(state: &Rc<RefCell<AppState>>) {
    let mut st = state.borrow_mut();
    stop_star_flash(&mut st);
    let Some(stars) = st.victory_stars_label.clone() else {
        return;
    };

    let stars_weak = stars.downgrade();
    let mut visible = true;
    let handle = glib::timeout_add_local(st.config.star_flash_interval(), move || {
        let Some(stars) = stars_weak.upgrade() else {
            return glib::ControlFlow::Break;
        };
        visible = !visible;
        stars.set_opacity(if visible { 1.0 } else { 0.0 });
        glib::ControlFlow::Continue
    });
    st.star_handle = Some(handle);
}
