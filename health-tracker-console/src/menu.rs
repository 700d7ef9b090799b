//! The menus as a finite-state machine.
//!
//! Every menu maps a validated choice to a [Step]. Unrecognized input becomes
//! [Step::InvalidChoice] carrying the same state, so the controller simply loops back.

use health_tracker_core::{Session, TipCategory};

/// The menus a user can be looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Home,
    Tips,
}

/// Something a menu option asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Register,
    Exit,
    Tips,
    LogMetrics,
    History,
    Doctors,
    Logout,
    ShowTips(TipCategory),
    MetricTips,
    Back,
}

const LOGIN_OPTIONS: [(&str, Action); 3] = [
    ("Login", Action::Login),
    ("Register", Action::Register),
    ("Exit", Action::Exit),
];

const HOME_OPTIONS: [(&str, Action); 6] = [
    ("Health Tips", Action::Tips),
    ("Log Health Metrics", Action::LogMetrics),
    ("View Health History", Action::History),
    ("Contact a Doctor", Action::Doctors),
    ("Logout", Action::Logout),
    ("Exit", Action::Exit),
];

const TIPS_OPTIONS: [(&str, Action); 5] = [
    ("General Tips", Action::ShowTips(TipCategory::General)),
    ("Nutrition Tips", Action::ShowTips(TipCategory::Nutrition)),
    ("Exercise Tips", Action::ShowTips(TipCategory::Exercise)),
    ("Tips for Your Metrics", Action::MetricTips),
    ("Back to Home", Action::Back),
];

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Hello there! Choose (1) to login or (2) to register a new account",
            Self::Home => "Welcome to Health Tracker!",
            Self::Tips => "Health Tips Menu:",
        }
    }

    pub fn options(&self) -> &'static [(&'static str, Action)] {
        match self {
            Self::Login => &LOGIN_OPTIONS,
            Self::Home => &HOME_OPTIONS,
            Self::Tips => &TIPS_OPTIONS,
        }
    }

    /// Resolves a typed choice, numbered from 1
    pub fn select(&self, choice: &str) -> Option<Action> {
        let choice = choice.trim();

        // 0 is a shortcut for going back
        if *self == Self::Tips && choice == "0" {
            return Some(Action::Back);
        }

        choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.options().get(i))
            .map(|(_, action)| *action)
    }

    /// The numbered lines of the menu
    pub fn lines(&self) -> Vec<String> {
        self.options()
            .iter()
            .enumerate()
            .map(|(i, (label, _))| format!("{}. {}", i + 1, label))
            .collect()
    }
}

/// Where the user currently is. Only logged in states hold a session.
#[derive(Debug, Clone, PartialEq)]
pub enum State {
    LoginMenu,
    HomeMenu(Session),
    TipsMenu(Session),
}

/// Work a menu choice requires before the next state is known
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Login,
    Register,
    LogMetrics(Session),
    ViewHistory(Session),
    ContactDoctor(Session),
    ShowTips(Session, TipCategory),
    ShowMetricTips(Session),
    Logout,
}

/// Why the program ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The user chose to exit
    Requested,
    /// Too many failed logins
    LockedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Go(State),
    Run(Task),
    InvalidChoice(State),
    Quit(Exit),
}

impl State {
    pub fn screen(&self) -> Screen {
        match self {
            Self::LoginMenu => Screen::Login,
            Self::HomeMenu(_) => Screen::Home,
            Self::TipsMenu(_) => Screen::Tips,
        }
    }

    pub fn choose(self, choice: &str) -> Step {
        let Some(action) = self.screen().select(choice) else {
            return Step::InvalidChoice(self);
        };

        match (self, action) {
            (_, Action::Exit) => Step::Quit(Exit::Requested),
            (Self::LoginMenu, Action::Login) => Step::Run(Task::Login),
            (Self::LoginMenu, Action::Register) => Step::Run(Task::Register),
            (Self::HomeMenu(session), Action::Tips) => Step::Go(Self::TipsMenu(session)),
            (Self::HomeMenu(session), Action::LogMetrics) => Step::Run(Task::LogMetrics(session)),
            (Self::HomeMenu(session), Action::History) => Step::Run(Task::ViewHistory(session)),
            (Self::HomeMenu(session), Action::Doctors) => Step::Run(Task::ContactDoctor(session)),
            (Self::HomeMenu(_), Action::Logout) => Step::Run(Task::Logout),
            (Self::TipsMenu(session), Action::ShowTips(category)) => {
                Step::Run(Task::ShowTips(session, category))
            }
            (Self::TipsMenu(session), Action::MetricTips) => Step::Run(Task::ShowMetricTips(session)),
            (Self::TipsMenu(session), Action::Back) => Step::Go(Self::HomeMenu(session)),
            // The option isn't offered on this screen
            (state, _) => Step::InvalidChoice(state),
        }
    }
}
