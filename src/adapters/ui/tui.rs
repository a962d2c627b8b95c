//! Implements InputPort. Inquire-based interactive prompts.
//!
//! Stands in for the web form: pre-fills from the saved profile, submits
//! through `ReviewService`, then offers copy / open actions.

use super::progress;
use crate::domain::{BusinessProfile, DomainError, RawForm, RequestOutcome, fields};
use crate::ports::{InputPort, ProfileStorePort};
use crate::usecases::ReviewService;
use async_trait::async_trait;
use crossterm::ExecutableCommand;
use crossterm::style::{Color as TermColor, Print, ResetColor, SetForegroundColor};
use inquire::error::InquireError;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::{Select, Text};
use std::fmt;
use std::io::stdout;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Applies the prompt theme globally.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("✦").with_fg(Color::LightMagenta))
        .with_highlighted_option_prefix(Styled::new("➜").with_fg(Color::LightYellow))
        .with_selected_option(Some(StyleSheet::new().with_fg(Color::LightYellow)));
    inquire::set_global_render_config(config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainAction {
    Generate,
    Quit,
}

impl fmt::Display for MainAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Generate => "✨ Generate a review",
            Self::Quit => "Quit",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReviewAction {
    Copy,
    OpenLink,
    Done,
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Copy => "📋 Copy review to clipboard",
            Self::OpenLink => "🔗 Open review page",
            Self::Done => "Done",
        })
    }
}

/// Esc / Ctrl-C end the session instead of surfacing as errors.
fn is_cancel(e: &InquireError) -> bool {
    matches!(
        e,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

fn ui_err(e: InquireError) -> DomainError {
    DomainError::Ui(e.to_string())
}

fn print_colored(text: &str, color: TermColor) {
    let mut out = stdout();
    let _ = out.execute(SetForegroundColor(color));
    let _ = out.execute(Print(text));
    let _ = out.execute(ResetColor);
    let _ = out.execute(Print("\r\n"));
}

/// Form values as typed, kept so the profile can be saved after success.
struct Submission {
    profile: BusinessProfile,
    experience: Option<String>,
}

impl Submission {
    fn to_form(&self) -> RawForm {
        let mut form = RawForm::new()
            .with(fields::BUSINESS_NAME, self.profile.business_name.as_str())
            .with(fields::PRODUCT_OR_SERVICE, self.profile.product_or_service.as_str())
            .with(fields::DESTINATION_LINK, self.profile.destination_link.as_str());
        if let Some(experience) = &self.experience {
            form.insert(fields::POSITIVE_EXPERIENCE, experience.as_str());
        }
        form
    }
}

/// Clipboard handle opened on first copy and kept until the session ends.
///
/// On X11 copied text only lives as long as the handle that set it.
struct SessionClipboard<C = arboard::Clipboard> {
    handle: Mutex<Option<C>>,
}

impl<C> SessionClipboard<C> {
    fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    fn with_handle<T, E>(
        &self,
        open: impl FnOnce() -> Result<C, E>,
        f: impl FnOnce(&mut C) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut slot = self.handle.lock().unwrap_or_else(|e| e.into_inner());
        let mut handle = match slot.take() {
            Some(h) => h,
            None => open()?,
        };
        let res = f(&mut handle);
        *slot = Some(handle);
        res
    }
}

impl SessionClipboard {
    fn set_text(&self, text: &str) -> Result<(), arboard::Error> {
        self.with_handle(arboard::Clipboard::new, |cb| cb.set_text(text))
    }
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    reviews: Arc<ReviewService>,
    profiles: Arc<dyn ProfileStorePort>,
    clipboard: SessionClipboard,
}

impl TuiInputPort {
    pub fn new(reviews: Arc<ReviewService>, profiles: Arc<dyn ProfileStorePort>) -> Self {
        Self {
            reviews,
            profiles,
            clipboard: SessionClipboard::new(),
        }
    }

    async fn saved_profile(&self) -> BusinessProfile {
        match self.profiles.load().await {
            Ok(profile) => profile.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "could not load saved profile");
                BusinessProfile::default()
            }
        }
    }

    fn ask_submission(&self, saved: &BusinessProfile) -> Result<Submission, InquireError> {
        let destination_link = Text::new("Review page link (optional):")
            .with_initial_value(&saved.destination_link)
            .with_help_message("Where the review will be posted, e.g. your Google Maps page")
            .prompt()?;
        let business_name = Text::new("Business name:")
            .with_initial_value(&saved.business_name)
            .prompt()?;
        let product_or_service = Text::new("Product or service:")
            .with_initial_value(&saved.product_or_service)
            .prompt()?;

        let experience = if self.reviews.prompt_builder().mode().requires_experience() {
            Some(
                Text::new("What did you enjoy?")
                    .with_help_message("At least 20 characters")
                    .prompt()?,
            )
        } else {
            None
        };

        Ok(Submission {
            profile: BusinessProfile {
                destination_link,
                business_name,
                product_or_service,
            },
            experience,
        })
    }

    /// One form round trip. Returns `Ok(false)` when the user cancelled.
    async fn generate_once(&self) -> Result<bool, DomainError> {
        let saved = self.saved_profile().await;
        let submission = match self.ask_submission(&saved) {
            Ok(s) => s,
            Err(e) if is_cancel(&e) => return Ok(false),
            Err(e) => return Err(ui_err(e)),
        };

        let pb = progress::spinner("Writing your review...");
        let outcome = self.reviews.handle(&submission.to_form()).await;
        pb.finish_and_clear();

        match outcome {
            RequestOutcome::Error { error } => {
                print_colored(&format!("✖ {}", error), TermColor::Red);
                Ok(true)
            }
            RequestOutcome::Review { review_text } => {
                print_colored("✔ Your glowing review is ready:", TermColor::Green);
                println!("\n{}\n", review_text);
                if let Err(e) = self.profiles.save(&submission.profile).await {
                    warn!(error = %e, "could not save profile");
                }
                self.review_actions(&review_text, &submission.profile.destination_link)
            }
        }
    }

    fn review_actions(&self, review_text: &str, link: &str) -> Result<bool, DomainError> {
        let link = link.trim();
        let mut actions = vec![ReviewAction::Copy];
        if !link.is_empty() {
            actions.push(ReviewAction::OpenLink);
        }
        actions.push(ReviewAction::Done);

        loop {
            let choice = match Select::new("Next:", actions.clone()).prompt() {
                Ok(c) => c,
                Err(e) if is_cancel(&e) => return Ok(true),
                Err(e) => return Err(ui_err(e)),
            };
            match choice {
                ReviewAction::Copy => {
                    match self.clipboard.set_text(review_text) {
                        Ok(()) => print_colored("Copied to clipboard.", TermColor::Green),
                        Err(e) => {
                            warn!(error = %e, "clipboard unavailable");
                            print_colored("Clipboard unavailable; copy the text above.", TermColor::Yellow);
                        }
                    }
                }
                ReviewAction::OpenLink => {
                    if let Err(e) = webbrowser::open(link) {
                        warn!(error = %e, link, "could not open browser");
                        print_colored(&format!("Open this link: {}", link), TermColor::Yellow);
                    }
                }
                ReviewAction::Done => return Ok(true),
            }
        }
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let choice = match Select::new(
                "What would you like to do?",
                vec![MainAction::Generate, MainAction::Quit],
            )
            .prompt()
            {
                Ok(c) => c,
                Err(e) if is_cancel(&e) => return Ok(()),
                Err(e) => return Err(ui_err(e)),
            };
            match choice {
                MainAction::Generate => {
                    if !self.generate_once().await? {
                        return Ok(());
                    }
                }
                MainAction::Quit => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_form_fields() {
        let submission = Submission {
            profile: BusinessProfile {
                destination_link: String::new(),
                business_name: "Cafe".into(),
                product_or_service: "Latte".into(),
            },
            experience: None,
        };
        let form = submission.to_form();
        assert_eq!(form.get(fields::BUSINESS_NAME), Some("Cafe"));
        assert_eq!(form.get(fields::PRODUCT_OR_SERVICE), Some("Latte"));
        assert_eq!(form.destination_link(), None);
        assert_eq!(form.get(fields::POSITIVE_EXPERIENCE), None);
    }

    #[test]
    fn test_clipboard_handle_outlives_each_copy() {
        let clipboard: SessionClipboard<Vec<String>> = SessionClipboard::new();
        let mut opened = 0;
        for text in ["first review", "second review"] {
            clipboard
                .with_handle(
                    || {
                        opened += 1;
                        Ok::<_, ()>(Vec::new())
                    },
                    |cb| {
                        cb.push(text.to_string());
                        Ok(())
                    },
                )
                .unwrap();
        }
        assert_eq!(opened, 1);
        let kept = clipboard.handle.lock().unwrap();
        assert_eq!(kept.as_deref(), Some(&["first review".to_string(), "second review".to_string()][..]));
    }

    #[test]
    fn test_clipboard_open_failure_keeps_nothing() {
        let clipboard: SessionClipboard<Vec<String>> = SessionClipboard::new();
        let res = clipboard.with_handle(|| Err("no display"), |_| Ok(()));
        assert_eq!(res, Err("no display"));
        assert!(clipboard.handle.lock().unwrap().is_none());
    }
}
