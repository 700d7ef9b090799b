use health_tracker_core::{
    AttemptOutcome, AuthError, Credentials, Database, DirectoryError, DoctorProfile,
    LoginAttempts, Registration, Session, Specialty, TipCategory, Tracker,
};
use log::{info, warn};
use tokio::runtime::Runtime;

use crate::{
    feedback::Feedback,
    menu::{Exit, State, Step, Task},
    render, ConsoleResult, Terminal,
};

/// Drives the menus for one interactive user.
///
/// Every tracker call blocks on the runtime until it completes.
pub struct Console<'a, Db, T> {
    tracker: &'a Tracker<Db>,
    runtime: &'a Runtime,
    terminal: T,
    attempts: LoginAttempts,
    /// Shown after the next screen clear, so they outlive the redraw
    notices: Vec<String>,
}

impl<'a, Db, T> Console<'a, Db, T>
where
    Db: Database,
    T: Terminal,
{
    pub fn new(tracker: &'a Tracker<Db>, runtime: &'a Runtime, terminal: T) -> Self {
        Self {
            tracker,
            runtime,
            terminal,
            attempts: LoginAttempts::default(),
            notices: vec![],
        }
    }

    /// Runs until the user exits or is locked out
    pub fn run(&mut self) -> ConsoleResult<Exit> {
        let mut step = Step::Go(State::LoginMenu);

        loop {
            let state = match step {
                Step::Go(state) => state,
                Step::InvalidChoice(state) => {
                    self.notify("Invalid choice. Please try again.");
                    state
                }
                Step::Run(task) => {
                    step = self.perform(task)?;
                    continue;
                }
                Step::Quit(exit) => {
                    self.show_notices()?;
                    self.farewell(exit)?;
                    return Ok(exit);
                }
            };

            let screen = state.screen();

            self.terminal.clear()?;
            self.show_notices()?;
            self.terminal.say(screen.title())?;
            for line in screen.lines() {
                self.terminal.say(&line)?;
            }

            let choice = self.terminal.ask("Select an option")?;
            step = state.choose(&choice);
        }
    }

    fn notify(&mut self, line: &str) {
        self.notices.push(line.to_string());
    }

    fn show_notices(&mut self) -> ConsoleResult<()> {
        for notice in std::mem::take(&mut self.notices) {
            self.terminal.say(&notice)?;
        }

        Ok(())
    }

    fn perform(&mut self, task: Task) -> ConsoleResult<Step> {
        match task {
            Task::Login => self.login(),
            Task::Register => self.register(),
            Task::LogMetrics(session) => self.log_metrics(session),
            Task::ViewHistory(session) => self.view_history(session),
            Task::ContactDoctor(session) => self.contact_doctor(session),
            Task::ShowTips(session, category) => self.show_tips(session, &[category]),
            Task::ShowMetricTips(session) => self.show_tips(session, &TipCategory::METRICS),
            Task::Logout => {
                self.notify("You have successfully logged out.");
                Ok(Step::Go(State::LoginMenu))
            }
        }
    }

    fn login(&mut self) -> ConsoleResult<Step> {
        loop {
            let credentials = Credentials {
                username: self.terminal.ask("Enter your username")?,
                password: self.terminal.ask_secret("Enter your password")?,
            };

            let error = match self.authenticate(credentials) {
                Ok(session) => {
                    self.notify("Login successful!");
                    return Ok(Step::Go(State::HomeMenu(session)));
                }
                Err(error) => error,
            };

            let message = error.feedback();

            // An unreachable database says nothing about the credentials
            if let AuthError::StorageFailure(_) = error {
                self.notify(&message);
                return Ok(Step::Go(State::LoginMenu));
            }

            self.terminal.say(&message)?;

            match self.attempts.record_failure() {
                AttemptOutcome::Retry { remaining } => {
                    self.terminal
                        .say(&format!("Try again, you have {remaining} attempt(s) left:"))?;
                }
                AttemptOutcome::LockedOut => return Ok(Step::Quit(Exit::LockedOut)),
            }
        }
    }

    fn authenticate(&mut self, credentials: Credentials) -> Result<Session, AuthError> {
        let session = self
            .runtime
            .block_on(self.tracker.auth.authenticate(credentials))?;

        self.attempts.record_success();
        Ok(session)
    }

    fn register(&mut self) -> ConsoleResult<Step> {
        loop {
            let username = self.terminal.ask("Enter your username")?;
            let password = self.terminal.ask_secret("Enter your password")?;
            let is_doctor = self.terminal.confirm("Are you a doctor?")?;

            let registration = if is_doctor {
                let profile = DoctorProfile {
                    name: self.terminal.ask("Enter your full name")?,
                    specialty: self.choose_specialty()?.to_string(),
                    email: self.terminal.ask("Enter your email")?,
                    phone: self.terminal.ask("Enter your phone number")?,
                };

                Registration::doctor(&username, &password, profile)
            } else {
                Registration::patient(&username, &password)
            };

            match self
                .runtime
                .block_on(self.tracker.registrar.register(registration))
            {
                Ok(()) if is_doctor => {
                    self.notify("Registration successful!");
                    self.notify("Your profile is now listed in the doctor directory.");
                    return Ok(Step::Go(State::LoginMenu));
                }
                Ok(()) => {
                    self.terminal.say("Registration successful!")?;

                    if !self.terminal.confirm("Do you want to login now?")? {
                        return Ok(Step::Go(State::LoginMenu));
                    }

                    return match self.authenticate(Credentials { username, password }) {
                        Ok(session) => Ok(Step::Go(State::HomeMenu(session))),
                        Err(error) => {
                            self.notify(&error.feedback());
                            Ok(Step::Go(State::LoginMenu))
                        }
                    };
                }
                Err(error) => {
                    warn!("Registration of {} rejected: {}", username, error);
                    self.terminal.say(&error.feedback())?;

                    if !self
                        .terminal
                        .confirm("Registration failed. Do you want to try again?")?
                    {
                        self.notify("Registration cancelled. Returning to the main menu.");
                        return Ok(Step::Go(State::LoginMenu));
                    }
                }
            }
        }
    }

    fn choose_specialty(&mut self) -> ConsoleResult<Specialty> {
        loop {
            self.terminal.say("Specialties available for Doctors:")?;
            for (i, specialty) in Specialty::ALL.iter().enumerate() {
                self.terminal.say(&format!("{}. {}", i + 1, specialty))?;
            }

            let choice = self.terminal.ask("Select a specialty by number")?;
            let specialty = choice
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(Specialty::from_position);

            match specialty {
                Some(specialty) => return Ok(specialty),
                None => self.terminal.say("Invalid choice. Please try again.")?,
            }
        }
    }

    fn log_metrics(&mut self, session: Session) -> ConsoleResult<Step> {
        loop {
            let weight = self.terminal.ask("Enter your weight (kg)")?;
            let blood_pressure = self.terminal.ask("Enter your blood pressure (e.g., 120/80)")?;
            let steps = self
                .terminal
                .ask("Enter the number of steps you took today")?;

            let result = self.runtime.block_on(self.tracker.metrics.record(
                session.username(),
                &weight,
                &blood_pressure,
                &steps,
            ));

            match result {
                Ok(()) => {
                    self.terminal.say("Health metrics logged successfully!")?;
                    self.terminal
                        .pause("Press Enter to return to the home menu.")?;
                    return Ok(Step::Go(State::HomeMenu(session)));
                }
                Err(error) => {
                    self.terminal.say(&error.feedback())?;

                    if !self.terminal.confirm("Would you like to try again?")? {
                        return Ok(Step::Go(State::HomeMenu(session)));
                    }
                }
            }
        }
    }

    fn view_history(&mut self, session: Session) -> ConsoleResult<Step> {
        let result = self
            .runtime
            .block_on(self.tracker.history.history(session.username()));

        match result {
            Ok(records) if records.is_empty() => {
                self.terminal.say("No health history found!")?;
            }
            Ok(records) => {
                self.terminal.say("Health history:")?;
                self.terminal
                    .say(&render::history_table(&records).to_string())?;
            }
            Err(error) => self.terminal.say(&error.feedback())?,
        }

        self.terminal.pause("Press Enter to continue...")?;
        Ok(Step::Go(State::HomeMenu(session)))
    }

    fn contact_doctor(&mut self, session: Session) -> ConsoleResult<Step> {
        let doctors = match self.runtime.block_on(self.tracker.doctors.list()) {
            Ok(doctors) => doctors,
            Err(error) => {
                self.terminal.say(&error.feedback())?;
                self.terminal
                    .pause("Press Enter to return to the home menu.")?;
                return Ok(Step::Go(State::HomeMenu(session)));
            }
        };

        if doctors.is_empty() {
            self.terminal.say("No doctors are available at the moment.")?;
            self.terminal
                .pause("Press Enter to return to the home menu.")?;
            return Ok(Step::Go(State::HomeMenu(session)));
        }

        self.terminal.say("Available Doctors:")?;
        self.terminal
            .say(&render::doctors_table(&doctors).to_string())?;

        loop {
            let answer = self
                .terminal
                .ask("Enter the ID of the doctor you wish to contact (blank to go back)")?;

            if answer.trim().is_empty() {
                break;
            }

            let Ok(doctor_id) = answer.trim().parse() else {
                self.terminal
                    .say("Invalid input. Please enter a valid number.")?;
                continue;
            };

            match self.runtime.block_on(self.tracker.doctors.contact(doctor_id)) {
                Ok(doctor) => {
                    info!("{} looked up doctor #{}", session.username(), doctor.id);

                    for line in render::doctor_card(&doctor) {
                        self.terminal.say(&line)?;
                    }
                    break;
                }
                Err(error @ DirectoryError::DoctorNotFound(_)) => {
                    self.terminal.say(&error.feedback())?;
                }
                Err(error) => {
                    self.terminal.say(&error.feedback())?;
                    break;
                }
            }
        }

        self.terminal
            .pause("Press Enter to return to the home menu.")?;
        Ok(Step::Go(State::HomeMenu(session)))
    }

    fn show_tips(&mut self, session: Session, categories: &[TipCategory]) -> ConsoleResult<Step> {
        for category in categories {
            self.terminal.say(&format!("{category} tips:"))?;

            for line in render::tip_lines(*category) {
                self.terminal.say(&line)?;
            }
        }

        self.terminal.pause("Press Enter to continue...")?;
        Ok(Step::Go(State::TipsMenu(session)))
    }

    fn farewell(&mut self, exit: Exit) -> ConsoleResult<()> {
        match exit {
            Exit::Requested => self.terminal.say("You have chosen to exit. Goodbye!"),
            Exit::LockedOut => {
                warn!("Closing after {} failed logins", LoginAttempts::MAX);
                self.terminal.say(
                    "Sorry, you have failed to login too many times, you may not be an official user!",
                )?;
                self.terminal.say("Closing System ...")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use health_tracker_core::{
        Database, DoctorProfile, MemoryDatabase, NewUser, Registration, Tracker,
    };
    use tokio::runtime::{Builder, Runtime};

    use crate::{menu::Exit, terminal::scripted::ScriptedTerminal};

    use super::Console;

    fn runtime() -> Runtime {
        Builder::new_current_thread().enable_all().build().unwrap()
    }

    fn tracker_with_alice(runtime: &Runtime, database: MemoryDatabase) -> Tracker<MemoryDatabase> {
        let tracker = Tracker::new(database);

        runtime
            .block_on(
                tracker
                    .registrar
                    .register(Registration::patient("alice", "Passw0rd")),
            )
            .unwrap();

        tracker
    }

    fn run(
        tracker: &Tracker<MemoryDatabase>,
        runtime: &Runtime,
        answers: &[&str],
    ) -> (Exit, ScriptedTerminal) {
        let mut console = Console::new(tracker, runtime, ScriptedTerminal::new(answers));
        let exit = console.run().unwrap();

        (exit, console.terminal)
    }

    #[test]
    fn invalid_choice_loops_back() {
        let runtime = runtime();
        let tracker = tracker_with_alice(&runtime, MemoryDatabase::default());

        let (exit, terminal) = run(&tracker, &runtime, &["9", "3"]);

        assert_eq!(exit, Exit::Requested);
        assert!(terminal.said("Invalid choice. Please try again."));
        assert!(terminal.said("You have chosen to exit. Goodbye!"));
    }

    #[test]
    fn messages_outlive_the_menu_redraw() {
        let runtime = runtime();
        let database = MemoryDatabase::default();
        database.go_offline();
        let tracker = Tracker::new(database);

        let (_, terminal) = run(&tracker, &runtime, &["9", "1", "bob", "pw", "3"]);

        assert!(terminal.saw("Invalid choice. Please try again."));
        assert!(terminal.saw("Could not reach the health database"));
    }

    #[test]
    fn login_and_logout_are_confirmed_on_the_next_menu() {
        let runtime = runtime();
        let tracker = tracker_with_alice(&runtime, MemoryDatabase::default());

        let (_, terminal) = run(&tracker, &runtime, &["1", "alice", "Passw0rd", "5", "3"]);

        assert!(terminal.saw("Login successful!"));
        assert!(terminal.saw("You have successfully logged out."));
    }

    #[test]
    fn unreadable_password_hashes_count_as_failed_logins() {
        let runtime = runtime();
        let database = MemoryDatabase::default();

        runtime
            .block_on(database.create_user(NewUser {
                username: "mallory".to_string(),
                password_hash: "not a password hash".to_string(),
            }))
            .unwrap();

        let tracker = Tracker::new(database);
        let answers = ["1", "mallory", "a", "mallory", "b", "mallory", "c"];
        let (exit, terminal) = run(&tracker, &runtime, &answers);

        assert_eq!(exit, Exit::LockedOut);
        assert!(terminal.said("Your account could not be verified"));
        assert!(terminal.said("you have 1 attempt(s) left"));
    }

    #[test]
    fn three_failed_logins_lock_out() {
        let runtime = runtime();
        let tracker = tracker_with_alice(&runtime, MemoryDatabase::default());

        let answers = ["1", "alice", "wrong1", "nobody", "x", "alice", "wrong2"];
        let (exit, terminal) = run(&tracker, &runtime, &answers);

        assert_eq!(exit, Exit::LockedOut);
        assert!(terminal.said("Incorrect password, try again!"));
        assert!(terminal.said("Username not found, try again!"));
        assert!(terminal.said("you have 2 attempt(s) left"));
        assert!(terminal.said("you have 1 attempt(s) left"));
        assert!(terminal.said("Closing System ..."));
    }

    #[test]
    fn success_resets_failed_attempts() {
        let runtime = runtime();
        let tracker = tracker_with_alice(&runtime, MemoryDatabase::default());

        let answers = [
            "1", "alice", "bad", "alice", "bad", "alice", "Passw0rd", // logged in
            "5", // logout
            "1", "alice", "bad", "alice", "Passw0rd", "6",
        ];
        let (exit, terminal) = run(&tracker, &runtime, &answers);

        assert_eq!(exit, Exit::Requested);
        assert!(terminal.said("You have successfully logged out."));
        assert!(!terminal.said("Closing System"));
    }

    #[test]
    fn storage_failures_do_not_count_as_attempts() {
        let runtime = runtime();
        let database = MemoryDatabase::default();
        database.go_offline();
        let tracker = Tracker::new(database);

        let answers = ["1", "alice", "a", "1", "alice", "b", "1", "alice", "c", "3"];
        let (exit, terminal) = run(&tracker, &runtime, &answers);

        assert_eq!(exit, Exit::Requested);
        assert!(terminal.said("Could not reach the health database"));
        assert!(!terminal.said("attempt(s) left"));
    }

    #[test]
    fn register_login_log_and_view_history() {
        let runtime = runtime();
        let tracker = Tracker::new(MemoryDatabase::default());

        let answers = [
            "2", "carol", "Secur3pass", "n", "y", // register and log in
            "2", "70.5", "120/80", "8000", // log metrics
            "3", // view history
            "6",
        ];
        let (exit, terminal) = run(&tracker, &runtime, &answers);

        assert_eq!(exit, Exit::Requested);
        assert_eq!(terminal.remaining(), 0);
        assert!(terminal.said("Registration successful!"));
        assert!(terminal.said("Health metrics logged successfully!"));
        assert!(terminal.said("70.5 kg"));
        assert!(terminal.said("120/80"));

        let history = runtime.block_on(tracker.history.history("carol")).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn failed_registration_can_be_retried() {
        let runtime = runtime();
        let tracker = tracker_with_alice(&runtime, MemoryDatabase::default());

        let answers = [
            "2", "alice", "Passw0rd", "n", "y", // duplicate, try again
            "dave", "short", "n", "n", // weak password, give up
            "3",
        ];
        let (exit, terminal) = run(&tracker, &runtime, &answers);

        assert_eq!(exit, Exit::Requested);
        assert!(terminal.said("Username already exists!"));
        assert!(terminal.said("Password must be at least 8 characters long!"));
        assert!(terminal.said("Registration cancelled."));
    }

    #[test]
    fn doctors_register_into_the_directory() {
        let runtime = runtime();
        let tracker = Tracker::new(MemoryDatabase::default());

        let answers = [
            "2", "drgrey", "Surg3ry!", "y", "Meredith Grey", "8", "5", "grey@example.com",
            "555-0199", "3",
        ];
        let (exit, terminal) = run(&tracker, &runtime, &answers);

        assert_eq!(exit, Exit::Requested);
        assert!(terminal.said("Invalid choice. Please try again."));
        assert!(terminal.said("listed in the doctor directory"));

        let doctors = runtime.block_on(tracker.doctors.list()).unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].name, "Meredith Grey");
    }

    #[test]
    fn invalid_metrics_offer_a_retry() {
        let runtime = runtime();
        let tracker = tracker_with_alice(&runtime, MemoryDatabase::default());

        let answers = [
            "1", "alice", "Passw0rd", "2", "heavy", "120/80", "100", "y", "70", "120-80", "100",
            "n", "6",
        ];
        let (_, terminal) = run(&tracker, &runtime, &answers);

        assert!(terminal.said("Please enter a valid number for weight!"));
        assert!(terminal.said("Blood pressure must be in format '120/80'"));
        assert!(!terminal.said("Health metrics logged successfully!"));
    }

    #[test]
    fn empty_history() {
        let runtime = runtime();
        let tracker = tracker_with_alice(&runtime, MemoryDatabase::default());

        let (_, terminal) = run(&tracker, &runtime, &["1", "alice", "Passw0rd", "3", "6"]);

        assert!(terminal.said("No health history found!"));
    }

    #[test]
    fn contact_a_doctor_by_id() {
        let runtime = runtime();
        let tracker = tracker_with_alice(&runtime, MemoryDatabase::default());

        let profile = DoctorProfile {
            name: "Gregory House".to_string(),
            specialty: "General Medicine".to_string(),
            email: "house@example.com".to_string(),
            phone: "555-0142".to_string(),
        };
        runtime
            .block_on(
                tracker
                    .registrar
                    .register(Registration::doctor("house", "Vic0din99", profile)),
            )
            .unwrap();

        let doctors = runtime.block_on(tracker.doctors.list()).unwrap();
        let id = doctors[0].id.to_string();

        let answers = ["1", "alice", "Passw0rd", "4", "two", "999", id.as_str(), "6"];
        let (_, terminal) = run(&tracker, &runtime, &answers);

        assert!(terminal.said("Dr. Gregory House"));
        assert!(terminal.said("Invalid input. Please enter a valid number."));
        assert!(terminal.said("Invalid doctor ID. Please try again."));
        assert!(terminal.said("Email: house@example.com"));
    }

    #[test]
    fn tips_menu_round_trip() {
        let runtime = runtime();
        let tracker = tracker_with_alice(&runtime, MemoryDatabase::default());

        let answers = ["1", "alice", "Passw0rd", "1", "2", "4", "0", "6"];
        let (exit, terminal) = run(&tracker, &runtime, &answers);

        assert_eq!(exit, Exit::Requested);
        assert!(terminal.said("Nutrition tips:"));
        assert!(terminal.said("Weight tips:"));
        assert!(terminal.said("Blood pressure tips:"));
        assert!(terminal.said("Steps tips:"));
    }
}
