use super::{PageRequest, widgets};
use crate::backend::hand_backend::HandSetEntry;
use crate::theme::{HandKind, ImageSource, Theme};
use egui::{ComboBox, Ui};

fn set_label(source: ImageSource, name: Option<&str>) -> String {
    match (source, name) {
        (ImageSource::None, _) | (_, None) => "(none)".to_string(),
        (ImageSource::User, Some(name)) => format!("{} (imported)", name),
        (ImageSource::Builtin, Some(name)) => name.to_string(),
    }
}

/// Shared label when all hands use the same set
fn common_set_label(theme: &Theme) -> String {
    let first = theme.hand(HandKind::Hour);
    let same = HandKind::ALL.iter().all(|kind| {
        let hand = theme.hand(*kind);
        hand.image_source == first.image_source && hand.image_name == first.image_name
    });
    if same {
        set_label(first.image_source, first.image_name.as_deref())
    } else {
        "(mixed)".to_string()
    }
}

/// Combo box over the hand sets; returns the picked one
fn set_picker<'a>(
    ui: &mut Ui,
    id: &str,
    selected_text: String,
    sets: &'a [HandSetEntry],
) -> Option<&'a HandSetEntry> {
    let mut picked = None;
    ComboBox::from_id_salt(id)
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            for entry in sets {
                if ui
                    .selectable_label(false, set_label(entry.source, Some(&entry.name)))
                    .clicked()
                {
                    picked = Some(entry);
                }
            }
        });
    picked
}

fn apply_set(theme: &mut Theme, kind: HandKind, entry: &HandSetEntry) -> bool {
    let hand = theme.hand_mut(kind);
    let name = Some(entry.name.clone());
    if hand.image_source == entry.source && hand.image_name == name {
        return false;
    }
    hand.image_source = entry.source;
    hand.image_name = name;
    true
}

fn hand_group(ui: &mut Ui, theme: &mut Theme, kind: HandKind, sets: &[HandSetEntry]) -> bool {
    let mut changed = false;
    let (length_range, tail_range) = match kind {
        HandKind::Hour => (0.3..=0.7, 0.0..=0.3),
        HandKind::Minute => (0.5..=0.9, 0.0..=0.3),
        HandKind::Second => (0.5..=1.0, 0.0..=0.4),
    };

    ui.horizontal(|ui| {
        ui.label("Image:");
        let current = theme.hand(kind);
        let label = set_label(current.image_source, current.image_name.as_deref());
        if let Some(entry) = set_picker(ui, &format!("{}_hand_set", kind.file_stem()), label, sets) {
            changed |= apply_set(theme, kind, entry);
        }
        if theme.hand(kind).has_image() && ui.button("Clear").clicked() {
            theme.hand_mut(kind).clear_image();
            changed = true;
        }
    });

    let has_image = theme.hand(kind).has_image();
    let hand = theme.hand_mut(kind);
    changed |= widgets::slider(ui, "Length:", &mut hand.length, length_range);
    if has_image {
        changed |= widgets::slider(ui, "Width:", &mut hand.image_width, 0.33..=3.0);
    } else {
        changed |= widgets::slider(ui, "Tail:", &mut hand.tail, tail_range);
        changed |= widgets::slider(ui, "Width:", &mut hand.width, 0.002..=0.1);
    }
    changed
}

pub fn show(
    ui: &mut Ui,
    theme: &mut Theme,
    sets: &[HandSetEntry],
    requests: &mut Vec<PageRequest>,
) -> bool {
    let mut changed = false;

    widgets::section(ui, "Hand Images");
    ui.horizontal(|ui| {
        ui.label("All hands:");
        if let Some(entry) = set_picker(ui, "all_hands_set", common_set_label(theme), sets) {
            for kind in HandKind::ALL {
                changed |= apply_set(theme, kind, entry);
            }
        }
        if theme.has_hand_images() && ui.button("Clear").clicked() {
            for kind in HandKind::ALL {
                theme.hand_mut(kind).clear_image();
            }
            changed = true;
        }
        if ui.button("Import folder…").clicked() {
            requests.push(PageRequest::ImportHandSet);
        }
    });

    for kind in HandKind::ALL {
        widgets::section(ui, &format!("{} Hand", kind.label()));
        changed |= hand_group(ui, theme, kind, sets);
    }

    widgets::section(ui, "Colors");
    changed |= widgets::color(ui, "Hands:", &mut theme.hands_color);
    changed |= widgets::color(ui, "Second hand:", &mut theme.second_hand_color);

    widgets::section(ui, "Center Dot");
    changed |= widgets::slider(ui, "Size:", &mut theme.center_dot_radius, 0.01..=0.1);

    changed
}
