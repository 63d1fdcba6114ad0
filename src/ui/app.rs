use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::gdk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;
use gio::SimpleAction;

use super::board::{
    CONTENT_MARGIN,
    append_guess_cup,
    build_cup_buttons,
    clear_marks,
    cup_row,
    play_click_bump,
    remove_last_guess_cup,
    render_display,
    render_guess,
    set_buttons_revealed,
    titled_panel,
};
use super::config;
use super::dialogs::{show_about_dialog, show_instructions_dialog, show_message_dialog};
use super::game::{ClickOutcome, Cup, RoundPhase, SubmitOutcome};
use super::hud::{
    start_timer,
    stop_round_animations,
    stop_star_flash,
    stop_timer,
    update_controls,
    update_stats,
    update_subtitle,
    update_timer_label,
};
use super::scene::{show_game_page, show_home, show_victory, visible_page};
use super::state::AppState;

const APP_ID: &str = "io.github.cupmemory.CupMemory";
const STYLE_CSS: &str = include_str!("../../data/style.css");

fn dialog_parent(state: &Rc<RefCell<AppState>>) -> Option<gtk::Widget> {
    state.borrow().window.clone().map(|win| win.upcast::<gtk::Widget>())
}

/// Fresh secret order, zeroed stats, timer restarted, reveal phase armed.
pub(super) fn start_round(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        stop_timer(&mut st);
        stop_round_animations(&mut st);
        stop_star_flash(&mut st);
        st.start_round();
        clear_marks(&st);
        render_guess(&st);
        render_display(&st);
        set_buttons_revealed(&st, false);
        if let Some(panel) = &st.guess_panel {
            panel.remove_css_class("ready");
        }
        update_stats(&st);
        update_controls(&st);
    }
    start_timer(state);
    schedule_reveal(state);
}

fn schedule_reveal(state: &Rc<RefCell<AppState>>) {
    let mut st = state.borrow_mut();
    let round_id = st.round.round_id;
    let state_reveal = state.clone();
    let handle = glib::timeout_add_local(st.config.reveal_delay(), move || {
        {
            let mut st = state_reveal.borrow_mut();
            st.reveal_handle = None;
            if st.round.round_id != round_id || !st.round.begin_shuffle() {
                return glib::ControlFlow::Break;
            }
            update_subtitle(&st);
        }
        start_shuffle(&state_reveal);
        glib::ControlFlow::Break
    });
    st.reveal_handle = Some(handle);
}

fn start_shuffle(state: &Rc<RefCell<AppState>>) {
    let mut st = state.borrow_mut();
    let round_id = st.round.round_id;
    let passes = st.config.shuffle_passes;
    if passes == 0 {
        st.round.finish_shuffle();
        drop(st);
        enable_input(state);
        return;
    }

    let state_shuffle = state.clone();
    let handle = glib::timeout_add_local(st.config.shuffle_interval(), move || {
        let mut st = state_shuffle.borrow_mut();
        if st.round.round_id != round_id || st.round.phase != RoundPhase::Shuffling {
            st.shuffle_handle = None;
            return glib::ControlFlow::Break;
        }
        let mut rng = rand::rng();
        let done = st.round.shuffle_display(&mut rng, passes);
        render_display(&st);
        if !done {
            return glib::ControlFlow::Continue;
        }
        st.shuffle_handle = None;
        drop(st);
        enable_input(&state_shuffle);
        glib::ControlFlow::Break
    });
    st.shuffle_handle = Some(handle);
}

fn enable_input(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let Some(panel) = &st.guess_panel {
        panel.add_css_class("ready");
    }
    set_buttons_revealed(&st, true);
    update_controls(&st);
    update_subtitle(&st);
    tracing::debug!(round = st.round.round_id, "input enabled");
}

pub fn handle_cup_click(state: &Rc<RefCell<AppState>>, cup: Cup, button: &gtk::Button) {
    let mut st = state.borrow_mut();
    if !st.round.accepts_input() {
        return;
    }
    play_click_bump(button, st.config.click_bump());

    if let ClickOutcome::Added { full } = st.round.click(cup) {
        append_guess_cup(&st, cup);
        button.add_css_class("picked");
        tracing::debug!(cup = cup.name(), full, "cup picked");
    }
}

fn handle_undo(state: &Rc<RefCell<AppState>>) {
    let mut st = state.borrow_mut();
    if st.round.undo().is_some() {
        remove_last_guess_cup(&st);
        clear_marks(&st);
    }
}

fn handle_submit(state: &Rc<RefCell<AppState>>) {
    let (report, round_id) = {
        let mut st = state.borrow_mut();
        let report = st.submit();
        update_stats(&st);
        update_controls(&st);
        (report, st.round.round_id)
    };
    let parent = dialog_parent(state);

    match report.outcome {
        SubmitOutcome::Ignored => {}
        SubmitOutcome::Incomplete => {
            show_message_dialog(
                parent.as_ref(),
                None,
                "Please select all cups before submitting.",
            );
        }
        SubmitOutcome::Wrong { .. } => {
            {
                let st = state.borrow();
                render_guess(&st);
                clear_marks(&st);
            }
            let dialog = show_message_dialog(parent.as_ref(), None, "Wrong order! Try again.");
            let state_ack = state.clone();
            dialog.connect_response(None, move |_, _| {
                let mut st = state_ack.borrow_mut();
                if st.round.round_id != round_id {
                    return;
                }
                st.round.acknowledge_wrong();
                update_subtitle(&st);
                update_controls(&st);
            });
        }
        SubmitOutcome::Correct { .. } => {
            {
                let mut st = state.borrow_mut();
                stop_timer(&mut st);
                update_timer_label(&st);
            }
            show_victory(state, report.new_best);
        }
    }
}

fn play_again(state: &Rc<RefCell<AppState>>) {
    start_round(state);
    show_game_page(state);
}

fn load_css() {
    let Some(display) = gdk::Display::default() else {
        return;
    };
    let provider = gtk::CssProvider::new();
    provider.load_from_data(STYLE_CSS);
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

fn control_button(label: &str, css_class: &str) -> gtk::Button {
    let button = gtk::Button::with_label(label);
    button.add_css_class("control-button");
    button.add_css_class(css_class);
    button.set_size_request(120, 40);
    button
}

fn build_home_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("home-root");

    let center = gtk::CenterBox::new();
    center.set_hexpand(true);
    center.set_vexpand(true);

    let content = gtk::Box::new(gtk::Orientation::Vertical, 10);
    content.set_halign(gtk::Align::Center);
    content.set_valign(gtk::Align::Center);
    content.add_css_class("home-content");

    let logo_path = state.borrow().config.logo_path();
    if logo_path.is_file() {
        let logo = gtk::Picture::for_filename(&logo_path);
        logo.set_can_shrink(true);
        logo.set_size_request(400, 120);
        logo.add_css_class("home-logo");
        content.append(&logo);
    } else {
        tracing::debug!(path = %logo_path.display(), "logo image missing, using text title");
        let fallback = gtk::Label::new(Some("Cup Memory"));
        fallback.add_css_class("home-title");
        fallback.add_css_class("title-1");
        content.append(&fallback);
    }

    let best_label = gtk::Label::new(None);
    best_label.add_css_class("home-best");
    best_label.add_css_class("dim-label");

    let buttons_box = gtk::Box::new(gtk::Orientation::Vertical, 8);
    buttons_box.set_halign(gtk::Align::Center);
    buttons_box.set_margin_top(10);

    let start_button = gtk::Button::with_label("Start Game");
    start_button.add_css_class("home-button");
    start_button.add_css_class("suggested-action");
    start_button.add_css_class("pill");
    start_button.set_size_request(200, 40);
    start_button.connect_clicked({
        let state = state.clone();
        move |_| {
            play_again(&state);
        }
    });

    let how_to_button = gtk::Button::with_label("How to Play");
    how_to_button.add_css_class("home-button");
    how_to_button.add_css_class("pill");
    how_to_button.set_size_request(200, 40);
    how_to_button.set_action_name(Some("app.instructions"));

    buttons_box.append(&start_button);
    buttons_box.append(&how_to_button);
    content.append(&best_label);
    content.append(&buttons_box);
    center.set_center_widget(Some(&content));
    root.append(&center);

    let credits = gtk::Label::new(Some("Program made by Aatalon & Arixen"));
    credits.add_css_class("caption");
    credits.add_css_class("dim-label");
    credits.set_halign(gtk::Align::Start);
    credits.set_margin_start(10);
    credits.set_margin_bottom(5);
    root.append(&credits);

    state.borrow_mut().home_best_label = Some(best_label);

    root
}

fn stat_label(text: &str) -> gtk::Label {
    let label = gtk::Label::new(Some(text));
    label.add_css_class("stat-label");
    label.set_halign(gtk::Align::Center);
    label
}

fn build_game_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("game-root");
    root.set_margin_top(CONTENT_MARGIN);
    root.set_margin_bottom(CONTENT_MARGIN);
    root.set_margin_start(CONTENT_MARGIN);
    root.set_margin_end(CONTENT_MARGIN);

    let stats = gtk::Box::new(gtk::Orientation::Vertical, 2);
    stats.add_css_class("stats-panel");
    let title = gtk::Label::new(Some("Cup Memory"));
    title.add_css_class("title-2");
    let timer_label = stat_label("Time: 00:00");
    let correct_label = stat_label("0 Correct");
    let attempts_label = stat_label("Attempts: 0");
    let high_score_label = stat_label("High Score: --:--");
    stats.append(&title);
    stats.append(&timer_label);
    stats.append(&correct_label);
    stats.append(&attempts_label);
    stats.append(&high_score_label);
    root.append(&stats);

    let display_row = cup_row("display-row");
    root.append(&titled_panel("Shuffled Cups", &display_row, "display-panel"));

    let buttons_row = cup_row("buttons-row");
    build_cup_buttons(state, &buttons_row);
    root.append(&buttons_row);

    let guess_row = cup_row("guess-row");
    let guess_panel = titled_panel("Your Guess", &guess_row, "guess-panel");
    root.append(&guess_panel);

    let controls = gtk::Box::new(gtk::Orientation::Horizontal, 20);
    controls.set_halign(gtk::Align::Center);
    controls.add_css_class("controls");

    let undo_button = control_button("Undo", "undo-button");
    undo_button.connect_clicked({
        let state = state.clone();
        move |_| handle_undo(&state)
    });
    let reset_button = control_button("Reset", "reset-button");
    reset_button.connect_clicked({
        let state = state.clone();
        move |_| start_round(&state)
    });
    let submit_button = control_button("Submit", "submit-button");
    submit_button.connect_clicked({
        let state = state.clone();
        move |_| handle_submit(&state)
    });
    let home_button = control_button("Home", "home-nav-button");
    home_button.connect_clicked({
        let state = state.clone();
        move |_| show_home(&state)
    });

    controls.append(&undo_button);
    controls.append(&reset_button);
    controls.append(&submit_button);
    controls.append(&home_button);
    root.append(&controls);

    {
        let mut st = state.borrow_mut();
        st.timer_label = Some(timer_label);
        st.correct_label = Some(correct_label);
        st.attempts_label = Some(attempts_label);
        st.high_score_label = Some(high_score_label);
        st.display_panel = Some(display_row);
        st.buttons_panel = Some(buttons_row);
        st.guess_panel = Some(guess_row);
        st.undo_button = Some(undo_button);
        st.submit_button = Some(submit_button);
    }

    root
}

fn build_victory_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("victory-root");

    let center = gtk::CenterBox::new();
    center.set_hexpand(true);
    center.set_vexpand(true);

    let card = gtk::Box::new(gtk::Orientation::Vertical, 14);
    card.set_halign(gtk::Align::Center);
    card.set_valign(gtk::Align::Center);
    card.add_css_class("victory-card");
    card.set_size_request(320, -1);

    let stars = gtk::Label::new(Some("✨✨✨"));
    stars.add_css_class("victory-stars");

    let title = gtk::Label::new(Some("Congratulations!"));
    title.add_css_class("victory-title");
    title.add_css_class("title-1");

    let message = gtk::Label::new(Some("You guessed correctly!"));
    message.add_css_class("body");

    let stats = gtk::Label::new(None);
    stats.add_css_class("victory-stats");
    stats.set_justify(gtk::Justification::Center);

    let best = gtk::Label::new(Some("New best time!"));
    best.add_css_class("victory-best");
    best.set_visible(false);

    let buttons = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    buttons.set_halign(gtk::Align::Center);
    buttons.set_margin_top(6);

    let again_btn = gtk::Button::with_label("Play Again");
    again_btn.add_css_class("suggested-action");
    again_btn.connect_clicked({
        let state = state.clone();
        move |_| play_again(&state)
    });
    let menu_btn = gtk::Button::with_label("Main Menu");
    menu_btn.connect_clicked({
        let state = state.clone();
        move |_| show_home(&state)
    });
    buttons.append(&again_btn);
    buttons.append(&menu_btn);

    card.append(&stars);
    card.append(&title);
    card.append(&message);
    card.append(&stats);
    card.append(&best);
    card.append(&buttons);
    center.set_center_widget(Some(&card));
    root.append(&center);

    {
        let mut st = state.borrow_mut();
        st.victory_stats_label = Some(stats);
        st.victory_best_label = Some(best);
        st.victory_stars_label = Some(stars);
    }

    root
}

fn register_actions(state: &Rc<RefCell<AppState>>, app: &adw::Application) {
    let instructions_action = SimpleAction::new("instructions", None);
    instructions_action.connect_activate({
        let state = state.clone();
        move |_, _| {
            show_instructions_dialog(dialog_parent(&state).as_ref());
        }
    });
    app.add_action(&instructions_action);

    let about_action = SimpleAction::new("about", None);
    about_action.connect_activate({
        let state = state.clone();
        move |_, _| {
            show_about_dialog(dialog_parent(&state).as_ref());
        }
    });
    app.add_action(&about_action);

    let quit_action = SimpleAction::new("quit", None);
    quit_action.connect_activate({
        let app = app.clone();
        move |_, _| app.quit()
    });
    app.add_action(&quit_action);
}

pub fn run() -> glib::ExitCode {
    glib::set_prgname(Some(APP_ID));
    glib::set_application_name("Cup Memory");
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        if let Some(win) = app.active_window() {
            win.present();
            return;
        }
        load_css();

        let state = Rc::new(RefCell::new(AppState::new(config::load())));
        register_actions(&state, app);

        let title_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
        title_box.set_valign(gtk::Align::Center);
        let title_main = gtk::Label::builder()
            .label("Cup Memory")
            .css_classes(vec!["game-title-main"])
            .build();
        let title_subtitle = gtk::Label::builder()
            .label("")
            .css_classes(vec!["game-title-subtitle", "caption"])
            .build();
        title_subtitle.set_visible(false);
        title_box.append(&title_main);
        title_box.append(&title_subtitle);

        let header = adw::HeaderBar::builder().title_widget(&title_box).build();
        header.add_css_class("flat");

        let back_button = gtk::Button::builder()
            .icon_name("go-previous-symbolic")
            .tooltip_text("Home")
            .build();
        back_button.set_visible(false);
        back_button.connect_clicked({
            let state = state.clone();
            move |_| show_home(&state)
        });
        header.pack_start(&back_button);

        let menu_model = gio::Menu::new();
        menu_model.append(Some("How to Play"), Some("app.instructions"));
        menu_model.append(Some("About Cup Memory"), Some("app.about"));
        menu_model.append(Some("Quit"), Some("app.quit"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();

        let reset_header_button = gtk::Button::builder()
            .icon_name("view-refresh-symbolic")
            .tooltip_text("Reset")
            .build();
        reset_header_button.set_visible(false);
        reset_header_button.connect_clicked({
            let state = state.clone();
            move |_| start_round(&state)
        });
        let end_box = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        end_box.append(&reset_header_button);
        end_box.append(&menu_button);
        header.pack_end(&end_box);

        let view_stack = gtk::Stack::new();
        view_stack.set_hexpand(true);
        view_stack.set_vexpand(true);
        view_stack.set_transition_duration(250);
        view_stack.add_named(&build_home_view(&state), Some("home"));
        view_stack.add_named(&build_game_view(&state), Some("game"));
        view_stack.add_named(&build_victory_view(&state), Some("victory"));
        view_stack.set_visible_child_name("home");

        let toolbar = adw::ToolbarView::new();
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&view_stack));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title("Cup Memory")
            .default_width(860)
            .default_height(720)
            .content(&toolbar)
            .build();
        win.set_size_request(360, 600);

        {
            let mut st = state.borrow_mut();
            st.window = Some(win.clone());
            st.view_stack = Some(view_stack);
            st.back_button = Some(back_button);
            st.reset_header_button = Some(reset_header_button);
            st.title_game_subtitle = Some(title_subtitle);
            update_stats(&st);
            update_controls(&st);
        }

        let key_controller = gtk::EventControllerKey::new();
        key_controller.set_propagation_phase(gtk::PropagationPhase::Capture);
        key_controller.connect_key_pressed({
            let state = state.clone();
            move |_, key, _, _| {
                if key != gdk::Key::Escape {
                    return glib::Propagation::Proceed;
                }
                let (in_game, dialog_open) = {
                    let st = state.borrow();
                    (
                        visible_page(&st).as_deref() == Some("game"),
                        st.window
                            .as_ref()
                            .and_then(|win| win.visible_dialog())
                            .is_some(),
                    )
                };
                if in_game && !dialog_open {
                    show_home(&state);
                    return glib::Propagation::Stop;
                }
                glib::Propagation::Proceed
            }
        });
        win.add_controller(key_controller);

        win.connect_close_request({
            let state = state.clone();
            move |_| {
                let mut st = state.borrow_mut();
                stop_timer(&mut st);
                stop_round_animations(&mut st);
                stop_star_flash(&mut st);
                tracing::info!("window closed");
                glib::Propagation::Proceed
            }
        });

        win.present();
    });

    app.run()
}
