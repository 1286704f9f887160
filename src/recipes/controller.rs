use tracing::{debug, warn};

use crate::error::AppResult;
use crate::view::RecipeView;

use super::dto::{share_text, FormMode, RecipeForm};
use super::filter::RecipeFilter;
use super::services::RecipeCatalog;

/// Raw values of the search and filter controls.
#[derive(Debug, Clone, Default)]
pub struct FilterInputs {
    pub search: String,
    pub category: String,
    pub difficulty: String,
    pub max_time: String,
    pub author: String,
}

/// Turns UI events into catalog calls and redraws the whole listing after
/// each one.
pub struct CatalogController<V: RecipeView> {
    catalog: RecipeCatalog,
    view: V,
    form_mode: FormMode,
}

impl<V: RecipeView> CatalogController<V> {
    pub fn new(catalog: RecipeCatalog, view: V) -> Self {
        let mut this = Self {
            catalog,
            view,
            form_mode: FormMode::Create,
        };
        this.render();
        this
    }

    pub fn catalog(&self) -> &RecipeCatalog {
        &self.catalog
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    pub fn render(&mut self) {
        let cards = self.catalog.cards();
        let stats = self.catalog.stats();
        self.view.display(&cards, &stats, self.catalog.view_mode());
    }

    pub fn on_filter_change(&mut self, inputs: &FilterInputs) {
        match RecipeFilter::from_inputs(
            &inputs.search,
            &inputs.category,
            &inputs.difficulty,
            &inputs.max_time,
            &inputs.author,
        ) {
            Ok(filter) => self.catalog.set_filter(filter),
            Err(e) => {
                self.view.report(&e);
                return;
            }
        }
        self.render();
    }

    pub fn on_open_add(&mut self) {
        self.form_mode = FormMode::Create;
        self.view.show_form(&RecipeForm::default(), self.form_mode);
    }

    pub fn on_open_edit(&mut self, id: i64) {
        match self.catalog.get(id) {
            Ok(recipe) => {
                let form = RecipeForm::from_recipe(recipe);
                self.form_mode = FormMode::Edit(id);
                self.view.show_form(&form, self.form_mode);
            }
            Err(e) => self.view.report(&e),
        }
    }

    /// Submits the form in whichever mode it was last opened. On failure the
    /// form stays open in the same mode.
    pub fn on_submit(&mut self, form: &RecipeForm) -> AppResult<i64> {
        let result = match self.form_mode {
            FormMode::Create => self.catalog.create(form).map(|r| r.id),
            FormMode::Edit(id) => self.catalog.update(id, form).map(|r| r.id),
        };
        match result {
            Ok(id) => {
                let message = match self.form_mode {
                    FormMode::Create => "Công thức mới đã được thêm!",
                    FormMode::Edit(_) => "Công thức đã được cập nhật!",
                };
                self.form_mode = FormMode::Create;
                self.view.show_success(message);
                self.render();
                Ok(id)
            }
            Err(e) => {
                debug!(error = %e, "recipe form rejected");
                self.view.report(&e);
                Err(e)
            }
        }
    }

    pub fn on_show_detail(&mut self, id: i64) {
        match self.catalog.detail(id) {
            Ok(detail) => self.view.show_detail(&detail),
            Err(e) => self.view.report(&e),
        }
    }

    pub fn on_share(&mut self, id: i64, page_url: &str) {
        match self.catalog.get(id) {
            Ok(recipe) => {
                let text = share_text(recipe, page_url);
                self.view.share(&text);
            }
            Err(e) => self.view.report(&e),
        }
    }

    /// Deletes after the view confirms. Returns whether anything was removed.
    pub fn on_delete(&mut self, id: i64) -> AppResult<bool> {
        if !self.view.confirm("Bạn có chắc chắn muốn xóa công thức này?") {
            debug!(recipe_id = id, "delete cancelled");
            return Ok(false);
        }
        if let Err(e) = self.catalog.delete(id) {
            warn!(error = %e, recipe_id = id, "delete failed");
            self.view.report(&e);
            return Err(e);
        }
        self.render();
        Ok(true)
    }

    pub fn on_toggle_favorite(&mut self, id: i64) -> AppResult<bool> {
        match self.catalog.toggle_favorite(id) {
            Ok(favorited) => {
                self.render();
                Ok(favorited)
            }
            Err(e) => {
                self.view.report(&e);
                Err(e)
            }
        }
    }

    pub fn on_toggle_view_mode(&mut self) {
        self.catalog.toggle_view_mode();
        self.render();
    }
}
