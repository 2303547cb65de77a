//! Modal dialog descriptions handed to the presentation layer.
//!
//! Core never draws dialogs. It describes them as tagged variants, the
//! adapter renders them and reports back which action the user chose.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Close,
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    /// Blocking message the user must acknowledge.
    Alert { title: String, message: String },
    /// Yes/no question.
    Confirm { title: String, message: String },
    /// Read-only list of lines.
    List { title: String, items: Vec<String> },
}

impl Dialog {
    pub fn alert(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Alert {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn confirm(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Confirm {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn list(title: impl Into<String>, items: Vec<String>) -> Self {
        Self::List {
            title: title.into(),
            items,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Alert { title, .. } | Self::Confirm { title, .. } | Self::List { title, .. } => {
                title
            }
        }
    }

    /// Buttons offered by this dialog, in display order.
    pub fn actions(&self) -> &'static [DialogAction] {
        match self {
            Self::Alert { .. } | Self::List { .. } => &[DialogAction::Close],
            Self::Confirm { .. } => &[DialogAction::Cancel, DialogAction::Confirm],
        }
    }

    /// Whether choosing `action` means "go ahead".
    ///
    /// Only a confirm dialog can be accepted; dismissing any dialog another
    /// way (overlay click, close button) counts as not accepted.
    pub fn is_accepted_by(&self, action: DialogAction) -> bool {
        matches!(self, Self::Confirm { .. }) && action == DialogAction::Confirm
    }
}

#[cfg(test)]
mod tests {
    use super::{Dialog, DialogAction};

    #[test]
    fn confirm_offers_cancel_then_confirm() {
        let dialog = Dialog::confirm("Delete zone", "Notes stay on the board.");
        assert_eq!(
            dialog.actions(),
            &[DialogAction::Cancel, DialogAction::Confirm]
        );
        assert!(dialog.is_accepted_by(DialogAction::Confirm));
        assert!(!dialog.is_accepted_by(DialogAction::Close));
    }

    #[test]
    fn alert_and_list_only_close() {
        let alert = Dialog::alert("Load error", "try later");
        let list = Dialog::list("Notes", vec!["a".to_string()]);
        assert_eq!(alert.title(), "Load error");
        assert_eq!(list.actions(), &[DialogAction::Close]);
        assert!(!alert.is_accepted_by(DialogAction::Confirm));
    }
}
