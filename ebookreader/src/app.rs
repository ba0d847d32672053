//! ebookreader application window

use crate::library::{ContentState, ImportStatus, Library};
use crate::source::SourceLocator;
use egui::{Context, Key, ScrollArea};
use readcore::theme;
use readcore::ThemeState;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application view
#[derive(Clone, Copy, PartialEq)]
enum View {
    Library,
    Reader,
}

enum BookAction {
    Open(String),
    Delete(String),
}

pub struct EbookReaderApp {
    library: Library,
    theme: ThemeState,
    view: View,
    show_import: bool,
    show_settings: bool,
    import_path: String,
    import_title: String,
    /// Last failure that is not tied to an import or a book
    notice: Option<String>,
    applied_dark: Option<bool>,
}

impl EbookReaderApp {
    pub fn new(cc: &eframe::CreationContext<'_>, mut library: Library, theme: ThemeState) -> Self {
        let ctx = cc.egui_ctx.clone();
        library.set_notifier(Arc::new(move || ctx.request_repaint()));
        Self {
            library,
            theme,
            view: View::Library,
            show_import: false,
            show_settings: false,
            import_path: String::new(),
            import_title: String::new(),
            notice: None,
            applied_dark: None,
        }
    }

    /// Import a local file, titled after its name
    pub fn import_file(&mut self, path: PathBuf) {
        let title = title_for_path(&path);
        self.library.import_book(SourceLocator::from(path), title);
    }

    fn apply_theme(&mut self, ctx: &Context, frame: &eframe::Frame) {
        let system_is_dark = frame.info().system_theme == Some(eframe::Theme::Dark);
        let dark = self.theme.effective_theme(system_is_dark);
        if self.applied_dark != Some(dark) {
            theme::apply(ctx, dark);
            self.applied_dark = Some(dark);
        }
    }

    fn handle_keyboard(&mut self, ctx: &Context) {
        if self.view == View::Reader && ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.close_book();
        }
    }

    fn close_book(&mut self) {
        self.library.close_book();
        self.view = View::Library;
    }

    fn render_menu_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.view == View::Reader && ui.button("library").clicked() {
                self.close_book();
            }
            if ui.button("import…").clicked() {
                self.show_import = true;
            }
            if ui.button("settings").clicked() {
                self.show_settings = true;
            }
        });
    }

    fn render_library(&mut self, ui: &mut egui::Ui) {
        if self.library.books().is_empty() {
            ui.label("no books yet. use import… to add a text file.");
            return;
        }

        let mut action = None;
        ScrollArea::vertical().show(ui, |ui| {
            for book in self.library.books() {
                ui.horizontal(|ui| {
                    if ui.button("open").clicked() {
                        action = Some(BookAction::Open(book.id.clone()));
                    }
                    if ui.button("delete").clicked() {
                        action = Some(BookAction::Delete(book.id.clone()));
                    }
                    ui.vertical(|ui| {
                        ui.strong(&book.title);
                        ui.small(&book.description);
                    });
                });
                ui.separator();
            }
        });

        match action {
            Some(BookAction::Open(id)) => {
                self.library.load_book_content(&id);
                self.view = View::Reader;
            }
            Some(BookAction::Delete(id)) => {
                self.library.remove_book(&id);
            }
            None => {}
        }
    }

    fn render_reader(&mut self, ui: &mut egui::Ui) {
        let Some(open) = self.library.open_book() else {
            self.view = View::Library;
            return;
        };
        ui.heading(&open.title);
        ui.separator();
        match &open.content {
            ContentState::Loading => {
                ui.label("loading…");
            }
            ContentState::Ready(text) => {
                ScrollArea::vertical().show(ui, |ui| {
                    ui.label(text.as_str());
                });
            }
            ContentState::Failed(reason) => {
                ui.label(format!("could not read this book: {}", reason));
            }
        }
    }

    fn render_import(&mut self, ctx: &Context) {
        let mut open = self.show_import;
        egui::Window::new("import book")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                egui::Grid::new("import_form").num_columns(2).show(ui, |ui| {
                    ui.label("file:");
                    ui.text_edit_singleline(&mut self.import_path);
                    ui.end_row();
                    ui.label("title:");
                    ui.text_edit_singleline(&mut self.import_title);
                    ui.end_row();
                });

                let path = self.import_path.trim();
                let ready = !path.is_empty() && self.library.import_status() != &ImportStatus::Loading;
                if ui.add_enabled(ready, egui::Button::new("import")).clicked() {
                    let source = SourceLocator::new(path);
                    let title = if self.import_title.trim().is_empty() {
                        title_for_path(Path::new(path))
                    } else {
                        self.import_title.trim().to_string()
                    };
                    self.library.import_book(source, title);
                }

                let mut dismiss = false;
                match self.library.import_status() {
                    ImportStatus::Idle => {}
                    ImportStatus::Loading => {
                        ui.label("importing…");
                    }
                    ImportStatus::Success(book) => {
                        ui.label(format!("imported \"{}\"", book.title));
                        dismiss = ui.button("ok").clicked();
                    }
                    ImportStatus::Error(reason) => {
                        ui.label(reason.as_str());
                        dismiss = ui.button("ok").clicked();
                    }
                }
                if dismiss {
                    self.library.reset_import_status();
                    self.import_path.clear();
                    self.import_title.clear();
                }
            });
        self.show_import = open;
    }

    fn render_settings(&mut self, ctx: &Context) {
        let mut open = self.show_settings;
        egui::Window::new("settings")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                let mut follow_system = self.theme.follow_system();
                if ui.checkbox(&mut follow_system, "follow system theme").changed() {
                    if let Err(e) = self.theme.toggle_follow_system() {
                        self.notice = Some(format!("settings not saved: {}", e));
                    }
                }
                let mut dark_mode = self.theme.dark_mode();
                if ui.checkbox(&mut dark_mode, "dark mode").changed() {
                    if let Err(e) = self.theme.toggle_dark_mode() {
                        self.notice = Some(format!("settings not saved: {}", e));
                    }
                }
            });
        self.show_settings = open;
    }

    fn render_status(&self, ui: &mut egui::Ui) {
        let status = match (&self.notice, self.library.is_busy()) {
            (Some(notice), _) => notice.clone(),
            (None, true) => "working…".to_string(),
            (None, false) => format!("{} books", self.library.books().len()),
        };
        ui.small(status);
    }
}

impl eframe::App for EbookReaderApp {
    fn update(&mut self, ctx: &Context, frame: &mut eframe::Frame) {
        self.apply_theme(ctx, frame);
        self.library.update();
        self.handle_keyboard(ctx);

        egui::TopBottomPanel::top("menu").show(ctx, |ui| self.render_menu_bar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.render_status(ui));
        egui::CentralPanel::default().show(ctx, |ui| match self.view {
            View::Library => self.render_library(ui),
            View::Reader => self.render_reader(ui),
        });

        if self.show_import {
            self.render_import(ctx);
        }
        if self.show_settings {
            self.render_settings(ctx);
        }
    }
}

fn title_for_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace('_', " "))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "untitled".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_for_path() {
        assert_eq!(title_for_path(Path::new("/docs/moby_dick.txt")), "moby dick");
        assert_eq!(title_for_path(Path::new("/")), "untitled");
    }
}
