// Game state enum for the outer screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    Options,
    Game,
}

// Menu option selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    NewGame,
    Resume,
    Options,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsOption {
    MusicToggle,
    SoundToggle,
    VolumeUp,
    VolumeDown,
    Back,
}

#[derive(Debug, Clone)]
pub struct Menu {
    pub state: MenuState,
    pub selected_option: MenuOption,
    pub options_selected: OptionsOption,
    /// Name typed on the main menu, carried into the run.
    pub player_name: String,
}

impl Default for Menu {
    fn default() -> Self {
        Self {
            state: MenuState::MainMenu,
            selected_option: MenuOption::NewGame,
            options_selected: OptionsOption::Back,
            player_name: String::new(),
        }
    }
}

impl Menu {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cycles the highlighted option downward. The Resume row only takes part
    /// when a saved run exists.
    pub fn next_option(&mut self, has_resume: bool) {
        match self.state {
            MenuState::MainMenu => {
                self.selected_option = match self.selected_option {
                    MenuOption::NewGame if has_resume => MenuOption::Resume,
                    MenuOption::NewGame | MenuOption::Resume => MenuOption::Options,
                    MenuOption::Options => MenuOption::Quit,
                    MenuOption::Quit => MenuOption::NewGame,
                };
            }
            MenuState::Options => {
                self.options_selected = match self.options_selected {
                    OptionsOption::MusicToggle => OptionsOption::SoundToggle,
                    OptionsOption::SoundToggle => OptionsOption::VolumeUp,
                    OptionsOption::VolumeUp => OptionsOption::VolumeDown,
                    OptionsOption::VolumeDown => OptionsOption::Back,
                    OptionsOption::Back => OptionsOption::MusicToggle,
                };
            }
            MenuState::Game => {}
        }
    }

    /// Cycles the highlighted option upward.
    pub fn prev_option(&mut self, has_resume: bool) {
        match self.state {
            MenuState::MainMenu => {
                self.selected_option = match self.selected_option {
                    MenuOption::NewGame => MenuOption::Quit,
                    MenuOption::Resume => MenuOption::NewGame,
                    MenuOption::Options if has_resume => MenuOption::Resume,
                    MenuOption::Options => MenuOption::NewGame,
                    MenuOption::Quit => MenuOption::Options,
                };
            }
            MenuState::Options => {
                self.options_selected = match self.options_selected {
                    OptionsOption::MusicToggle => OptionsOption::Back,
                    OptionsOption::SoundToggle => OptionsOption::MusicToggle,
                    OptionsOption::VolumeUp => OptionsOption::SoundToggle,
                    OptionsOption::VolumeDown => OptionsOption::VolumeUp,
                    OptionsOption::Back => OptionsOption::VolumeDown,
                };
            }
            MenuState::Game => {}
        }
    }

    /// Appends a typed character to the name field, up to the cap.
    pub fn push_name_char(&mut self, c: char) {
        if self.player_name.len() < crate::game::MAX_NAME_LEN && !c.is_control() {
            self.player_name.push(c);
        }
    }

    pub fn pop_name_char(&mut self) {
        self.player_name.pop();
    }
}
