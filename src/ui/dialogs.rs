use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

const INSTRUCTIONS: &str = "Goal:\n\
Memorize the correct cup color order!\n\n\
Steps:\n\
1. Watch carefully as the cups shuffle.\n\
2. Click the correct order of cups.\n\
3. If correct, you win! Otherwise, try again.\n\n\
Tip:\n\
Focus closely and don't blink!";

pub fn show_instructions_dialog(parent: Option<&gtk::Widget>) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(Some("How to Play"), Some(INSTRUCTIONS));
    dialog.add_response("close", "Close");
    dialog.set_default_response(Some("close"));
    dialog.set_close_response("close");
    dialog.present(parent);
    dialog
}

pub fn show_message_dialog(
    parent: Option<&gtk::Widget>,
    heading: Option<&str>,
    body: &str,
) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(heading, Some(body));
    dialog.add_response("ok", "OK");
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(parent);
    dialog
}

pub fn show_about_dialog(parent: Option<&gtk::Widget>) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Cup Memory")
        .developer_name("Aatalon & Arixen")
        .developers(vec!["Aatalon", "Arixen"])
        .version(env!("CARGO_PKG_VERSION"))
        .comments("A memory game about cups and the order they started in.")
        .build();
    dialog.add_legal_section("Cup Memory", None, gtk::License::MitX11, None);
    dialog.present(parent);
    dialog
}
