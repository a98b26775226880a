//! Type definitions for the application screens.

use std::path::PathBuf;

use crate::game::Engine;

/// Enumeration of available application screens.
///
/// This enumeration holds information about the current screen of the game. This is used to
/// determine which screen to render and what actions to take based on user input.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    /// Main menu screen of the game.
    MainMenu,
    /// Map file path entry screen.
    ///
    /// This variant holds the text typed so far along with the map files found in the working
    /// directory.
    PathPrompt(Prompt),
    /// Map loading failure screen.
    ///
    /// This variant holds the message explaining why the chosen map could not be played.
    LoadFailed(String),
    /// In-game screen.
    ///
    /// This variant owns the engine of the session being played.
    InGame(Engine),
}

/// State of the map path entry screen.
///
/// This structure holds the text typed so far and the map files found in the working directory.
/// Tab replaces the input with the next of those files.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Prompt {
    /// Text typed by the user.
    ///
    /// This field is taken as the map path when the user presses Enter.
    pub(crate) input: String,
    /// Map files offered for completion.
    pub(crate) suggestions: Vec<PathBuf>,
    /// Index into [`suggestions`](Prompt::suggestions) of the last completion, if the input still
    /// holds it.
    pub(crate) selected: Option<usize>,
}

impl Prompt {
    /// Creates an empty prompt offering `suggestions` for completion.
    pub(crate) const fn new(suggestions: Vec<PathBuf>) -> Self {
        Self {
            input: String::new(),
            suggestions,
            selected: None,
        }
    }

    /// Appends a typed character.
    pub(crate) fn push(&mut self, ch: char) {
        self.input.push(ch);
        self.selected = None;
    }

    /// Removes the last typed character.
    pub(crate) fn pop(&mut self) {
        let _ = self.input.pop();
        self.selected = None;
    }

    /// Replaces the input with the next suggestion, wrapping around at the end of the list.
    pub(crate) fn complete(&mut self) {
        let count = self.suggestions.len();
        if count == 0 {
            return;
        }
        let next = self.selected.map_or(0, |index| (index + 1) % count);

        if let Some(path) = self.suggestions.get(next) {
            self.input = path.display().to_string();
            self.selected = Some(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Grid;

    #[test]
    fn test_screen_variants() {
        let main_menu = Screen::MainMenu;
        let prompt = Screen::PathPrompt(Prompt::default());
        let failed = Screen::LoadFailed("This file does not exist.".to_owned());
        let in_game = Screen::InGame(Engine::new(Grid::default()));

        assert_eq!(main_menu, Screen::MainMenu);
        assert_ne!(main_menu, prompt);
        assert_ne!(prompt, failed);
        assert_ne!(failed, in_game);
    }

    #[test]
    fn test_prompt_typing() {
        let mut prompt = Prompt::new(Vec::new());

        for ch in "map.pws_mapx".chars() {
            prompt.push(ch);
        }
        prompt.pop();

        assert_eq!(prompt.input, "map.pws_map");
    }

    #[test]
    fn test_prompt_pop_on_empty_input() {
        let mut prompt = Prompt::default();

        prompt.pop();

        assert_eq!(prompt.input, "");
    }

    #[test]
    fn test_prompt_completion_cycles() {
        let mut prompt = Prompt::new(vec![
            PathBuf::from("a.pws_map"),
            PathBuf::from("b.pws_map"),
        ]);

        prompt.complete();
        assert_eq!(prompt.input, "a.pws_map");
        prompt.complete();
        assert_eq!(prompt.input, "b.pws_map");
        prompt.complete();
        assert_eq!(prompt.input, "a.pws_map");
    }

    #[test]
    fn test_prompt_typing_resets_completion() {
        let mut prompt = Prompt::new(vec![
            PathBuf::from("a.pws_map"),
            PathBuf::from("b.pws_map"),
        ]);

        prompt.complete();
        prompt.complete();
        prompt.push('x');
        assert_eq!(prompt.selected, None);

        prompt.complete();
        assert_eq!(prompt.input, "a.pws_map");
    }

    #[test]
    fn test_prompt_completion_without_suggestions() {
        let mut prompt = Prompt::default();
        prompt.push('m');

        prompt.complete();

        assert_eq!(prompt.input, "m");
        assert_eq!(prompt.selected, None);
    }
}
