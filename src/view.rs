use std::io::Write;

use crate::error::AppError;
use crate::recipes::dto::{CatalogStats, FormMode, RecipeCard, RecipeDetail, RecipeForm, ViewMode};

/// Feedback slots every form screen offers.
pub trait FormFeedback {
    fn show_error(&mut self, field: &str, message: &str);
    fn show_success(&mut self, message: &str);

    fn report(&mut self, err: &AppError) {
        for e in err.field_errors() {
            self.show_error(e.field, &e.message);
        }
    }
}

/// Everything the catalog screen needs from a UI.
pub trait RecipeView: FormFeedback {
    fn display(&mut self, cards: &[RecipeCard], stats: &CatalogStats, mode: ViewMode);
    fn show_detail(&mut self, detail: &RecipeDetail);
    fn show_form(&mut self, form: &RecipeForm, mode: FormMode);
    fn confirm(&mut self, prompt: &str) -> bool;
    /// Hands share text to the platform (share sheet, clipboard, ...).
    fn share(&mut self, text: &str);
}

/// Plain-text rendering to any writer. Confirmations are answered with a
/// fixed value, since a writer cannot ask back.
pub struct ConsoleView<W: Write> {
    out: W,
    assume_yes: bool,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W, assume_yes: bool) -> Self {
        Self { out, assume_yes }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!(error = %e, "console write failed");
        }
    }
}

impl<W: Write> FormFeedback for ConsoleView<W> {
    fn show_error(&mut self, field: &str, message: &str) {
        self.line(&format!("[error] {}: {}", field, message));
    }

    fn show_success(&mut self, message: &str) {
        self.line(&format!("[ok] {}", message));
    }
}

impl<W: Write> RecipeView for ConsoleView<W> {
    fn display(&mut self, cards: &[RecipeCard], stats: &CatalogStats, mode: ViewMode) {
        self.line(&format!(
            "{} recipes ({} yours, {} favorites, {} shown)",
            stats.total, stats.user_recipes, stats.favorites, stats.shown
        ));
        if cards.is_empty() {
            self.line("No recipes found.");
            return;
        }
        for card in cards {
            let heart = if card.favorited { "♥" } else { "♡" };
            match mode {
                ViewMode::Grid => self.line(&format!(
                    "{} {} · {} · {}",
                    heart, card.name, card.difficulty_label, card.time_label
                )),
                ViewMode::List => {
                    self.line(&format!("{} [{}] {}", heart, card.id, card.name));
                    self.line(&format!("    {}", card.description));
                    self.line(&format!(
                        "    {} · {} · {}",
                        card.difficulty_label,
                        card.time_label,
                        card.tags.join(", ")
                    ));
                }
            }
        }
    }

    fn show_detail(&mut self, detail: &RecipeDetail) {
        self.line(&format!("== {} ==", detail.name));
        self.line(&detail.description);
        self.line(&format!(
            "{} · {} · {} · {}",
            detail.category_label, detail.difficulty_label, detail.time_label, detail.servings_label
        ));
        self.line("Nguyên liệu:");
        for item in &detail.ingredients {
            self.line(&format!("  - {}", item));
        }
        self.line("Cách làm:");
        for (i, step) in detail.instructions.iter().enumerate() {
            self.line(&format!("  {}. {}", i + 1, step));
        }
        if !detail.tags.is_empty() {
            self.line(&format!("Tags: {}", detail.tags.join(", ")));
        }
    }

    fn show_form(&mut self, form: &RecipeForm, mode: FormMode) {
        let title = match mode {
            FormMode::Create => "Thêm Công Thức Mới".to_string(),
            FormMode::Edit(id) => format!("Chỉnh Sửa Công Thức #{}", id),
        };
        self.line(&title);
        self.line(&format!("  name: {}", form.name));
        self.line(&format!("  category: {} / difficulty: {}", form.category, form.difficulty));
        self.line(&format!("  time: {} / servings: {}", form.time, form.servings));
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.line(&format!("{} [{}]", prompt, if self.assume_yes { "y" } else { "n" }));
        self.assume_yes
    }

    fn share(&mut self, text: &str) {
        self.line(text);
        self.show_success("Đã sao chép link chia sẻ!");
    }
}
