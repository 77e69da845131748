//! Interactive text menu over the contact service.
//!
//! # Responsibility
//! - Collect and re-prompt each field until it validates.
//! - Dispatch menu choices to `ContactService` operations.
//!
//! # Invariants
//! - Validation errors never leave the prompt that collected the field.
//! - End of input ends the session through the same save path as `7`.

use crate::render::{write_record, write_records};
use chrono::NaiveDate;
use log::{error, info};
use phonebook_core::{
    normalize_identity_component, BirthDate, Contact, ContactId, ContactPatch, ContactService,
    DirectoryStore, Phone, SearchCriteria, ServiceError,
};
use std::io::{self, BufRead, Write};

const MENU: &str = "\nAvailable commands\n\
1 - List all records\n\
2 - Search records\n\
3 - Add a record\n\
4 - Delete a record\n\
5 - Update a record\n\
6 - Show a person's age\n\
7 - Save and exit";

/// Reason a command stopped before finishing.
#[derive(Debug)]
enum Interrupt {
    /// Input stream is exhausted.
    Eof,
    Io(io::Error),
}

impl From<io::Error> for Interrupt {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

type Step<T> = Result<T, Interrupt>;

/// Whether a name component prompt accepts an empty answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Required,
    Optional,
}

/// Outcome of the duplicate-identity choice during add.
enum DuplicateChoice {
    Overwrite,
    Retry,
    Abandon,
}

/// Menu session bound to one service and one pair of console streams.
pub struct Menu<'svc, S: DirectoryStore, R: BufRead, W: Write> {
    service: &'svc mut ContactService<S>,
    input: R,
    output: W,
    today: fn() -> NaiveDate,
}

impl<'svc, S: DirectoryStore, R: BufRead, W: Write> Menu<'svc, S, R, W> {
    pub fn new(
        service: &'svc mut ContactService<S>,
        input: R,
        output: W,
        today: fn() -> NaiveDate,
    ) -> Self {
        Self {
            service,
            input,
            output,
            today,
        }
    }

    /// Runs until `7` or end of input, then saves the directory.
    ///
    /// # Errors
    /// - Console I/O failures.
    /// - The final save failing.
    pub fn run(mut self) -> anyhow::Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;
            let choice = match self.read_line("Enter a digit: ") {
                Ok(line) => line,
                Err(Interrupt::Eof) => break,
                Err(Interrupt::Io(err)) => return Err(err.into()),
            };

            let step = match choice.trim() {
                "1" => self.list_all(),
                "2" => self.search_records(),
                "3" => self.add_record(),
                "4" => self.delete_record(),
                "5" => self.update_record(),
                "6" => self.show_age(),
                "7" => break,
                _ => self.say("Invalid choice. Try again."),
            };

            match step {
                Ok(()) => {}
                Err(Interrupt::Eof) => break,
                Err(Interrupt::Io(err)) => return Err(err.into()),
            }
        }

        self.service.save()?;
        info!("event=session_end module=cli status=ok");
        writeln!(self.output, "Directory saved. Goodbye!")?;
        Ok(())
    }

    fn list_all(&mut self) -> Step<()> {
        let records = self.service.list();
        if records.is_empty() {
            return self.say("Directory is empty.");
        }
        write_records(&mut self.output, "DIRECTORY", &records)?;
        Ok(())
    }

    fn search_records(&mut self) -> Step<()> {
        self.say("Enter search criteria. Leave a field empty to ignore it.")?;
        let criteria = SearchCriteria {
            name: self.prompt_component("Name: ", Field::Optional)?,
            surname: self.prompt_component("Surname: ", Field::Optional)?,
            phone: self
                .prompt_phone("Phone (11 digits): ", Field::Optional)?
                .map(|phone| phone.as_str().to_string()),
            dob: self
                .prompt_dob("Date of birth (dd.mm.yyyy): ")?
                .map(|dob| dob.to_string()),
        };

        let hits = self.service.search(&criteria);
        if hits.is_empty() {
            return self.say("No records found.");
        }
        write_records(&mut self.output, "FOUND RECORDS", &hits)?;
        Ok(())
    }

    fn add_record(&mut self) -> Step<()> {
        let id = loop {
            let id = self.prompt_identity()?;
            if !self.service.contains(&id) {
                break id;
            }
            match self.prompt_duplicate_choice()? {
                DuplicateChoice::Overwrite => return self.edit_existing(id),
                DuplicateChoice::Retry => continue,
                DuplicateChoice::Abandon => return Ok(()),
            }
        };

        let Some(phone) = self.prompt_phone("Phone (11 digits): ", Field::Required)? else {
            return Ok(());
        };
        let dob = self.prompt_dob("Date of birth (dd.mm.yyyy) or leave empty: ")?;

        match self.service.add(id, Contact::new(phone, dob)) {
            Ok(()) => self.say("Record added."),
            Err(err) => self.report(err),
        }
    }

    fn delete_record(&mut self) -> Step<()> {
        let Some(id) = self.prompt_lookup()? else {
            return self.say("Record not found.");
        };
        match self.service.delete(&id) {
            Ok(_) => self.say("Record deleted."),
            Err(err) => self.report(err),
        }
    }

    fn update_record(&mut self) -> Step<()> {
        match self.prompt_lookup()? {
            Some(id) if self.service.contains(&id) => self.edit_existing(id),
            _ => self.say("Record not found."),
        }
    }

    fn show_age(&mut self) -> Step<()> {
        let Some(id) = self.prompt_lookup()? else {
            return self.say("Record not found.");
        };
        match self.service.age(&id, (self.today)()) {
            Ok(years) => self.say(&format!("Age: {years} years.")),
            Err(err) => self.report(err),
        }
    }

    /// Shows the current record and applies an optional-field patch.
    fn edit_existing(&mut self, id: ContactId) -> Step<()> {
        if let Some(contact) = self.service.get(&id).cloned() {
            self.say("Current data:")?;
            write_record(&mut self.output, &id, &contact)?;
        }

        let patch = ContactPatch {
            name: self.prompt_component("New name or leave empty: ", Field::Optional)?,
            surname: self.prompt_component("New surname or leave empty: ", Field::Optional)?,
            phone: self.prompt_phone("New phone (11 digits) or leave empty: ", Field::Optional)?,
            dob: self.prompt_dob("New date of birth (dd.mm.yyyy) or leave empty: ")?,
        };

        match self.service.update(&id, patch) {
            Ok(outcome) => {
                if outcome.displaced.is_some() {
                    self.say(&format!("Existing record for {} was replaced.", outcome.id))?;
                }
                self.say("Record updated.")
            }
            Err(err) => self.report(err),
        }
    }

    fn prompt_identity(&mut self) -> Step<ContactId> {
        loop {
            let name = self.prompt_component("Name: ", Field::Required)?;
            let surname = self.prompt_component("Surname: ", Field::Required)?;
            if let (Some(name), Some(surname)) = (name, surname) {
                match ContactId::new(name, surname) {
                    Ok(id) => return Ok(id),
                    Err(err) => self.say(&err.to_string())?,
                }
            }
        }
    }

    /// Reads a name/surname pair without re-prompting; an invalid pair
    /// cannot be stored, so it is reported as not found.
    fn prompt_lookup(&mut self) -> Step<Option<ContactId>> {
        let name = self.read_line("Name: ")?;
        let surname = self.read_line("Surname: ")?;
        Ok(ContactId::new(name, surname).ok())
    }

    fn prompt_duplicate_choice(&mut self) -> Step<DuplicateChoice> {
        self.say("A record with this name and surname already exists.")?;
        loop {
            self.say("1 - Edit the existing record")?;
            self.say("2 - Enter a different name and surname")?;
            self.say("3 - Back to the command menu")?;
            match self.read_line("Enter a digit: ")?.trim() {
                "1" => return Ok(DuplicateChoice::Overwrite),
                "2" => return Ok(DuplicateChoice::Retry),
                "3" => return Ok(DuplicateChoice::Abandon),
                _ => self.say("Invalid choice. Try again.")?,
            }
        }
    }

    fn prompt_component(&mut self, prompt: &str, field: Field) -> Step<Option<String>> {
        loop {
            let line = self.read_line(prompt)?;
            if line.trim().is_empty() && field == Field::Optional {
                return Ok(None);
            }
            match normalize_identity_component(&line) {
                Ok(component) => return Ok(Some(component)),
                Err(err) => self.say(&err.to_string())?,
            }
        }
    }

    fn prompt_phone(&mut self, prompt: &str, field: Field) -> Step<Option<Phone>> {
        loop {
            let line = self.read_line(prompt)?;
            if line.trim().is_empty() && field == Field::Optional {
                return Ok(None);
            }
            match Phone::parse(&line) {
                Ok(phone) => return Ok(Some(phone)),
                Err(err) => self.say(&err.to_string())?,
            }
        }
    }

    fn prompt_dob(&mut self, prompt: &str) -> Step<Option<BirthDate>> {
        loop {
            let line = self.read_line(prompt)?;
            let text = line.trim();
            if text.is_empty() {
                return Ok(None);
            }
            match BirthDate::parse(text) {
                Ok(dob) => return Ok(Some(dob)),
                Err(err) => self.say(&err.to_string())?,
            }
        }
    }

    fn report(&mut self, err: ServiceError) -> Step<()> {
        match err {
            ServiceError::RecordNotFound(_) => self.say("Record not found."),
            ServiceError::MissingDob(_) => self.say("Date of birth is not specified."),
            ServiceError::Store(err) => {
                error!("event=command_failed module=cli status=error error_code=store");
                self.say(&format!("Failed to save the directory: {err}"))
            }
            other => self.say(&other.to_string()),
        }
    }

    fn say(&mut self, message: &str) -> Step<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Step<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Interrupt::Eof);
        }
        Ok(line.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::Menu;
    use chrono::NaiveDate;
    use phonebook_core::{
        BirthDate, Contact, ContactId, ContactRepository, ContactService, Directory,
        DirectoryStore, Phone, StoreResult,
    };
    use std::cell::RefCell;
    use std::io::Cursor;

    #[derive(Default)]
    struct RecordingStore {
        saves: RefCell<Vec<Directory>>,
    }

    impl DirectoryStore for RecordingStore {
        fn load(&self) -> StoreResult<Directory> {
            Ok(Directory::new())
        }

        fn save(&self, directory: &Directory) -> StoreResult<()> {
            self.saves.borrow_mut().push(directory.clone());
            Ok(())
        }
    }

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn id(name: &str, surname: &str) -> ContactId {
        ContactId::new(name, surname).unwrap()
    }

    fn seeded_service() -> ContactService<RecordingStore> {
        let directory: Directory = [(
            id("Ivan", "Petrov"),
            Contact::new(
                Phone::parse("89991234567").unwrap(),
                Some(BirthDate::parse("01.02.1990").unwrap()),
            ),
        )]
        .into_iter()
        .collect();
        ContactService::with_directory(directory, RecordingStore::default())
    }

    fn run_script(service: &mut ContactService<RecordingStore>, script: &str) -> String {
        let mut output = Vec::new();
        Menu::new(service, Cursor::new(script.as_bytes()), &mut output, fixed_today)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn add_reprompts_invalid_fields_and_normalizes_phone() {
        let mut service = seeded_service();
        let output = run_script(
            &mut service,
            "3\nanna!\nanna\nsmirnova\n123\n+79997654321\n31.02.2020\n\n7\n",
        );

        assert!(output.contains("invalid name component `anna!`"));
        assert!(output.contains("invalid phone `123`"));
        assert!(output.contains("invalid date of birth `31.02.2020`"));
        assert!(output.contains("Record added."));

        let stored = service.get(&id("Anna", "Smirnova")).unwrap();
        assert_eq!(stored.phone.as_str(), "89997654321");
        assert_eq!(stored.dob, None);
        assert_eq!(service.store().saves.borrow().len(), 2);
    }

    #[test]
    fn duplicate_add_can_retry_with_another_identity() {
        let mut service = seeded_service();
        let output = run_script(
            &mut service,
            "3\nivan\npetrov\n9\n2\nivan\nivanov\n89990000000\n\n7\n",
        );

        assert!(output.contains("already exists"));
        assert!(output.contains("Invalid choice"));
        assert!(service.contains(&id("Ivan", "Ivanov")));
        assert_eq!(
            service.get(&id("Ivan", "Petrov")).unwrap().phone.as_str(),
            "89991234567"
        );
    }

    #[test]
    fn duplicate_add_can_return_to_menu_without_changes() {
        let mut service = seeded_service();
        let before = service.directory().clone();
        let output = run_script(&mut service, "3\nivan\npetrov\n3\n7\n");

        assert!(output.contains("already exists"));
        assert!(!output.contains("Record added."));
        assert_eq!(service.directory(), &before);
        // Only the exit save ran.
        let saves = service.store().saves.borrow();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0], before);
    }

    #[test]
    fn duplicate_add_overwrite_runs_update_flow() {
        let mut service = seeded_service();
        run_script(&mut service, "3\nIvan\nPetrov\n1\n\n\n+79990000000\n\n7\n");

        let stored = service.get(&id("Ivan", "Petrov")).unwrap();
        assert_eq!(stored.phone.as_str(), "89990000000");
        assert_eq!(stored.dob, Some(BirthDate::parse("01.02.1990").unwrap()));
    }

    #[test]
    fn update_renames_identity() {
        let mut service = seeded_service();
        let output = run_script(&mut service, "5\nivan\npetrov\n\nivanov\n\n\n7\n");

        assert!(output.contains("Record updated."));
        assert!(!service.contains(&id("Ivan", "Petrov")));
        assert!(service.contains(&id("Ivan", "Ivanov")));
        assert_eq!(service.directory().len(), 1);
    }

    #[test]
    fn age_delete_and_missing_records_are_reported() {
        let mut service = seeded_service();
        let output = run_script(
            &mut service,
            "6\nIvan\nPetrov\n6\nNo\nBody\n4\nIvan\nPetrov\n4\nIvan\nPetrov\n1\n7\n",
        );

        assert!(output.contains("Age: 33 years."));
        assert!(output.contains("Record deleted."));
        assert_eq!(output.matches("Record not found.").count(), 2);
        assert!(output.contains("Directory is empty."));
        assert!(service.directory().is_empty());
    }

    #[test]
    fn search_filters_and_end_of_input_saves() {
        let mut service = seeded_service();
        let output = run_script(&mut service, "2\n\npetrov\n+79991234567\n\n");

        assert!(output.contains("FOUND RECORDS"));
        assert!(output.contains("Name: Ivan"));
        assert!(output.contains("Directory saved."));
        assert_eq!(service.store().saves.borrow().len(), 1);
    }
}
