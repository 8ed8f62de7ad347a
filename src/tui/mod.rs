mod ui;
mod widgets;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::models::{ModuleCategory, ModuleId, UserId};
use crate::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Modules,
    ModuleDetail,
    Students,
    StudentDetail,
}

impl View {
    fn next(&self) -> Self {
        match self {
            View::Dashboard => View::Modules,
            View::Modules => View::Students,
            View::ModuleDetail => View::Modules,
            View::Students => View::Dashboard,
            View::StudentDetail => View::Students,
        }
    }

    fn prev(&self) -> Self {
        match self {
            View::Dashboard => View::Students,
            View::Modules => View::Dashboard,
            View::ModuleDetail => View::Modules,
            View::Students => View::Modules,
            View::StudentDetail => View::Students,
        }
    }
}

pub struct StatefulList<T> {
    pub items: Vec<T>,
    pub selected: Option<usize>,
}

impl<T> StatefulList<T> {
    fn with_items(items: Vec<T>) -> Self {
        let selected = if items.is_empty() { None } else { Some(0) };
        Self { items, selected }
    }

    fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.selected = Some(i);
    }

    fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
    }

    fn first(&mut self) {
        if !self.items.is_empty() {
            self.selected = Some(0);
        }
    }

    fn last(&mut self) {
        if !self.items.is_empty() {
            self.selected = Some(self.items.len() - 1);
        }
    }

    fn selected_item(&self) -> Option<&T> {
        self.selected.and_then(|i| self.items.get(i))
    }
}

pub struct App {
    pub platform: Platform,
    data_path: PathBuf,
    pub teacher: Option<UserId>,
    pub view: View,
    pub modules: StatefulList<ModuleId>,
    pub students: StatefulList<UserId>,
    pub selected_module: Option<ModuleId>,
    pub selected_student: Option<UserId>,
    pub filter_category: Option<ModuleCategory>,
    pub filter_input: String,
    pub filter_mode: bool,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(platform: Platform, data_path: PathBuf, teacher: Option<UserId>) -> Self {
        let mut app = Self {
            platform,
            data_path,
            teacher,
            view: View::Dashboard,
            modules: StatefulList::with_items(Vec::new()),
            students: StatefulList::with_items(Vec::new()),
            selected_module: None,
            selected_student: None,
            filter_category: None,
            filter_input: String::new(),
            filter_mode: false,
            status: None,
            should_quit: false,
        };
        app.rebuild_lists();
        app
    }

    // Modules ordered like the learning path: difficulty, then title
    fn module_ids(&self) -> Vec<ModuleId> {
        let mut modules: Vec<_> = self
            .platform
            .modules()
            .filter(|m| self.filter_category.map_or(true, |c| m.category == c))
            .collect();
        modules.sort_by(|a, b| {
            a.difficulty
                .cmp(&b.difficulty)
                .then_with(|| a.title.cmp(&b.title))
        });
        modules.into_iter().map(|m| m.id).collect()
    }

    fn rebuild_lists(&mut self) {
        self.modules = StatefulList::with_items(self.module_ids());
        self.students =
            StatefulList::with_items(self.platform.students().iter().map(|u| u.id).collect());
    }

    /// Re-reads the data file so changes made from the CLI show up.
    pub fn refresh_data(&mut self) {
        if self.data_path.exists() {
            match Platform::load(&self.data_path) {
                Ok(platform) => {
                    self.platform = platform;
                    self.status = None;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "tui refresh failed, keeping current data");
                    self.status = Some(format!("Refresh failed: {}", e));
                }
            }
        }
        self.rebuild_lists();
        if let Some(id) = self.selected_module {
            if self.platform.module(&id).is_none() {
                self.selected_module = None;
            }
        }
        if let Some(id) = self.selected_student {
            if self.platform.user(&id).is_none() {
                self.selected_student = None;
            }
        }
    }

    fn apply_filter(&mut self) {
        if self.filter_input.is_empty() {
            self.filter_category = None;
            self.status = None;
        } else if let Some(category) = ModuleCategory::from_str(&self.filter_input) {
            self.filter_category = Some(category);
            self.status = None;
        } else {
            self.status = Some(format!("Unknown category '{}'", self.filter_input));
        }
        self.modules = StatefulList::with_items(self.module_ids());
    }

    fn clear_filter(&mut self) {
        self.filter_category = None;
        self.filter_input.clear();
        self.status = None;
        self.modules = StatefulList::with_items(self.module_ids());
    }

    fn select_module(&mut self) {
        if let Some(id) = self.modules.selected_item() {
            self.selected_module = Some(*id);
            self.view = View::ModuleDetail;
        }
    }

    fn select_student(&mut self) {
        if let Some(id) = self.students.selected_item() {
            self.selected_student = Some(*id);
            self.view = View::StudentDetail;
        }
    }

    fn back(&mut self) {
        match self.view {
            View::ModuleDetail => {
                self.view = View::Modules;
                self.selected_module = None;
            }
            View::StudentDetail => {
                self.view = View::Students;
                self.selected_student = None;
            }
            _ => self.view = self.view.prev(),
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if self.filter_mode {
            match key {
                KeyCode::Esc => {
                    self.filter_mode = false;
                    self.filter_input.clear();
                }
                KeyCode::Enter => {
                    self.filter_mode = false;
                    self.apply_filter();
                }
                KeyCode::Backspace => {
                    self.filter_input.pop();
                }
                KeyCode::Char(c) => {
                    self.filter_input.push(c);
                }
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,

            KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.refresh_data();
            }

            KeyCode::Char('/') if self.view == View::Modules => {
                self.filter_mode = true;
                self.filter_input.clear();
            }

            KeyCode::Esc => match self.view {
                View::ModuleDetail | View::StudentDetail => self.back(),
                View::Modules if self.filter_category.is_some() => self.clear_filter(),
                _ => {}
            },

            KeyCode::Char('h') | KeyCode::Left => self.back(),
            KeyCode::Char('l') | KeyCode::Right => match self.view {
                View::Modules => self.select_module(),
                View::Students => self.select_student(),
                _ => self.view = self.view.next(),
            },

            KeyCode::Tab => {
                if modifiers.contains(KeyModifiers::SHIFT) {
                    self.view = self.view.prev();
                } else {
                    self.view = self.view.next();
                }
            }
            KeyCode::BackTab => {
                self.view = self.view.prev();
            }

            KeyCode::Char('j') | KeyCode::Down => match self.view {
                View::Modules => self.modules.next(),
                View::Students => self.students.next(),
                _ => {}
            },
            KeyCode::Char('k') | KeyCode::Up => match self.view {
                View::Modules => self.modules.previous(),
                View::Students => self.students.previous(),
                _ => {}
            },

            KeyCode::Char('g') => match self.view {
                View::Modules => self.modules.first(),
                View::Students => self.students.first(),
                _ => {}
            },
            KeyCode::Char('G') => match self.view {
                View::Modules => self.modules.last(),
                View::Students => self.students.last(),
                _ => {}
            },

            KeyCode::Enter => match self.view {
                View::Modules => self.select_module(),
                View::Students => self.select_student(),
                _ => {}
            },

            _ => {}
        }
    }
}

pub fn run(
    platform: Platform,
    data_path: PathBuf,
    teacher: Option<UserId>,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(platform, data_path, teacher);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key.code, key.modifiers);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use uuid::Uuid;

    fn setup_app() -> App {
        let mut platform = Platform::with_sample_content();
        platform.create_user("zoe", "zoe@school.edu", UserRole::Student);
        platform.create_user("adam", "adam@school.edu", UserRole::Student);
        let teacher = platform
            .create_user("dr_smith", "smith@school.edu", UserRole::Teacher)
            .id;
        let path = std::env::temp_dir().join(format!("literacy-tui-{}.json", Uuid::new_v4()));
        App::new(platform, path, Some(teacher))
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    mod list_tests {
        use super::*;

        #[test]
        fn next_and_previous_wrap() {
            let mut list = StatefulList::with_items(vec![1, 2, 3]);
            assert_eq!(list.selected, Some(0));
            list.previous();
            assert_eq!(list.selected, Some(2));
            list.next();
            assert_eq!(list.selected, Some(0));
        }

        #[test]
        fn empty_list_has_no_selection() {
            let mut list: StatefulList<u8> = StatefulList::with_items(Vec::new());
            list.next();
            list.last();
            assert!(list.selected_item().is_none());
        }
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn tab_cycles_top_level_views() {
            let mut app = setup_app();
            assert_eq!(app.view, View::Dashboard);
            press(&mut app, KeyCode::Tab);
            assert_eq!(app.view, View::Modules);
            press(&mut app, KeyCode::Tab);
            assert_eq!(app.view, View::Students);
            press(&mut app, KeyCode::Tab);
            assert_eq!(app.view, View::Dashboard);
        }

        #[test]
        fn students_sorted_by_username() {
            let app = setup_app();
            let names: Vec<_> = app
                .students
                .items
                .iter()
                .filter_map(|id| app.platform.user(id))
                .map(|u| u.username.as_str())
                .collect();
            assert_eq!(names, vec!["adam", "zoe"]);
        }

        #[test]
        fn enter_opens_detail_and_esc_returns() {
            let mut app = setup_app();
            app.view = View::Students;
            press(&mut app, KeyCode::Char('j'));
            press(&mut app, KeyCode::Enter);
            assert_eq!(app.view, View::StudentDetail);
            assert_eq!(app.selected_student, app.students.items.get(1).copied());

            press(&mut app, KeyCode::Esc);
            assert_eq!(app.view, View::Students);
            assert!(app.selected_student.is_none());
        }

        #[test]
        fn modules_start_with_beginner() {
            let mut app = setup_app();
            app.view = View::Modules;
            press(&mut app, KeyCode::Char('l'));
            let id = app.selected_module.unwrap();
            assert_eq!(
                app.platform.module(&id).unwrap().title,
                crate::catalog::INTRO_TITLE
            );
        }

        #[test]
        fn q_quits() {
            let mut app = setup_app();
            press(&mut app, KeyCode::Char('q'));
            assert!(app.should_quit);
        }
    }

    mod filter_tests {
        use super::*;

        fn type_filter(app: &mut App, text: &str) {
            press(app, KeyCode::Char('/'));
            for c in text.chars() {
                press(app, KeyCode::Char(c));
            }
            press(app, KeyCode::Enter);
        }

        #[test]
        fn category_filter_narrows_modules() {
            let mut app = setup_app();
            app.view = View::Modules;
            assert_eq!(app.modules.items.len(), 2);

            type_filter(&mut app, "ethics");
            assert_eq!(app.filter_category, Some(ModuleCategory::EthicsBias));
            assert_eq!(app.modules.items.len(), 1);

            press(&mut app, KeyCode::Esc);
            assert!(app.filter_category.is_none());
            assert_eq!(app.modules.items.len(), 2);
        }

        #[test]
        fn unknown_category_sets_status() {
            let mut app = setup_app();
            app.view = View::Modules;
            type_filter(&mut app, "robotics");
            assert!(app.filter_category.is_none());
            assert!(app.status.as_deref().unwrap().contains("robotics"));
            assert_eq!(app.modules.items.len(), 2);
        }

        #[test]
        fn slash_ignored_outside_modules() {
            let mut app = setup_app();
            press(&mut app, KeyCode::Char('/'));
            assert!(!app.filter_mode);
        }
    }

    #[test]
    fn refresh_without_file_keeps_data() {
        let mut app = setup_app();
        app.refresh_data();
        assert_eq!(app.students.items.len(), 2);
        assert!(app.status.is_none());
    }
}
