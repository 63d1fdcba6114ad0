use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;

use super::app::handle_cup_click;
use super::config::GameConfig;
use super::game::Cup;
use super::state::AppState;

pub const CONTENT_MARGIN: i32 = 12;
pub const CUP_GAP: i32 = 15;
pub const CUP_WIDTH: i32 = 60;
pub const CUP_HEIGHT: i32 = 90;

/// Missing image files are not handled: the picture simply stays empty.
pub fn cup_picture(config: &GameConfig, cup: Cup) -> gtk::Picture {
    let picture = gtk::Picture::for_filename(config.cup_image_path(cup));
    picture.set_can_shrink(true);
    picture.set_size_request(CUP_WIDTH, CUP_HEIGHT);
    picture.set_tooltip_text(Some(cup.name()));
    picture.add_css_class("cup-picture");
    picture
}

pub fn cup_row(css_class: &str) -> gtk::Box {
    let row = gtk::Box::new(gtk::Orientation::Horizontal, CUP_GAP);
    row.set_halign(gtk::Align::Center);
    row.set_valign(gtk::Align::Center);
    row.set_margin_top(10);
    row.set_margin_bottom(10);
    row.add_css_class("cup-row");
    row.add_css_class(css_class);
    row
}

pub fn titled_panel(title: &str, row: &gtk::Box, css_class: &str) -> gtk::Box {
    let panel = gtk::Box::new(gtk::Orientation::Vertical, 4);
    panel.add_css_class("cup-panel");
    panel.add_css_class(css_class);
    panel.set_hexpand(true);
    panel.set_vexpand(true);

    let heading = gtk::Label::new(Some(title));
    heading.add_css_class("cup-panel-title");
    heading.add_css_class("heading");
    heading.set_halign(gtk::Align::Start);
    panel.append(&heading);
    panel.append(row);
    panel
}

fn clear_row(row: &gtk::Box) {
    while let Some(child) = row.first_child() {
        row.remove(&child);
    }
}

pub(super) fn render_cups(config: &GameConfig, row: &gtk::Box, cups: &[Cup]) {
    clear_row(row);
    for cup in cups {
        row.append(&cup_picture(config, *cup));
    }
}

pub(super) fn render_display(st: &AppState) {
    if let Some(panel) = &st.display_panel {
        render_cups(&st.config, panel, &st.round.display);
    }
}

pub(super) fn render_guess(st: &AppState) {
    if let Some(panel) = &st.guess_panel {
        render_cups(&st.config, panel, &st.round.guess);
    }
}

pub(super) fn append_guess_cup(st: &AppState, cup: Cup) {
    if let Some(panel) = &st.guess_panel {
        panel.append(&cup_picture(&st.config, cup));
    }
}

pub(super) fn remove_last_guess_cup(st: &AppState) {
    if let Some(panel) = &st.guess_panel
        && let Some(last) = panel.last_child()
    {
        panel.remove(&last);
    }
}

/// Clears the highlight on every cup button, not only the last picked one.
pub(super) fn clear_marks(st: &AppState) {
    for (_, button) in &st.cup_buttons {
        button.remove_css_class("picked");
    }
}

pub(super) fn set_buttons_revealed(st: &AppState, revealed: bool) {
    if let Some(panel) = &st.buttons_panel {
        panel.set_opacity(if revealed { 1.0 } else { 0.0 });
        panel.set_can_target(revealed);
    }
}

pub(super) fn play_click_bump(button: &gtk::Button, bump: std::time::Duration) {
    button.remove_css_class("cup-bump");
    button.add_css_class("cup-bump");
    let button_weak = button.downgrade();
    glib::timeout_add_local_once(bump, move || {
        if let Some(button) = button_weak.upgrade() {
            button.remove_css_class("cup-bump");
        }
    });
}

pub fn build_cup_buttons(state: &Rc<RefCell<AppState>>, row: &gtk::Box) {
    let config = state.borrow().config.clone();
    let mut buttons = Vec::with_capacity(Cup::PALETTE.len());

    for cup in Cup::PALETTE {
        let button = gtk::Button::builder()
            .css_classes(vec!["cup-button", "flat"])
            .tooltip_text(cup.name())
            .build();
        button.set_child(Some(&cup_picture(&config, cup)));

        let state_clone = state.clone();
        button.connect_clicked(move |button| {
            handle_cup_click(&state_clone, cup, button);
        });

        row.append(&button);
        buttons.push((cup, button));
    }

    state.borrow_mut().cup_buttons = buttons;
}
