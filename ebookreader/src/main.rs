use eframe::NativeOptions;
use ebookreader::app::EbookReaderApp;
use ebookreader::library::Library;
use ebookreader::source::FsResolver;
use ebookreader::store::BookStore;
use ebookreader::APP_NAME;
use readcore::storage::books_dir;
use readcore::{ThemePreferences, ThemeState};
use std::sync::Arc;

fn main() -> eframe::Result<()> {
    readcore::logging::init();

    let initial_file = std::env::args().nth(1).map(std::path::PathBuf::from);

    let store = BookStore::open(books_dir(APP_NAME), Arc::new(FsResolver));
    let library = Library::new(store);
    let theme = ThemeState::load(ThemePreferences::config_path(APP_NAME));

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 480.0])
            .with_title("ebookreader"),
        follow_system_theme: true,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| {
            let mut app = EbookReaderApp::new(cc, library, theme);
            if let Some(path) = initial_file {
                if path.exists() {
                    app.import_file(path);
                } else {
                    tracing::warn!(path = %path.display(), "file to import does not exist");
                }
            }
            Box::new(app)
        }),
    )
}
