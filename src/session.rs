//! Line-driven directory session.
//!
//! Each input line is one user action: edit a filter, run a search, open the add-clinic dialog.
//! The session answers with the lines to print, so it can be driven from stdin or from tests.

use clinic_core::{
    search::split_list,
    table::{render_table, Emphasis, LOADING_MESSAGE},
    ClinicBackend, ClinicForm, DirectoryView, FilterColumn, FilterPanel, LookupField,
    SearchQuery, ServiceDraft,
};

pub const HELP: &str = "\
Commands:
  show                      redraw the table
  reload | retry            fetch the full clinic list again
  dismiss                   hide the error banner
  term [TEXT]               set (or clear) the global search term
  filter COLUMN             open/close the filter for a column
  type TEXT                 edit the open filter's draft
  apply | clear | close     apply, clear or discard the open filter
  set COLUMN VALUE          set a column filter directly
  unset COLUMN              clear a column filter
  clear-all                 clear every filter and reload
  search TERM               server-side free-text search
  advanced name=..;phone=..;services=a,b
  lookup FIELD VALUE        FIELD: clinic-code, doctor-name, address, name, phone
  services A,B              clinics offering any of the services
  add                       register a clinic ('cancel' discards the dialog)
  quit
Columns: id, name, doctor, address, phone, services";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Reload,
    Dismiss,
    Term(String),
    Filter(FilterColumn),
    Type(String),
    Apply,
    Clear,
    Close,
    Set(FilterColumn, String),
    Unset(FilterColumn),
    ClearAll,
    Search(SearchQuery),
    Add,
    Quit,
}

fn column(arg: &str) -> Result<FilterColumn, String> {
    arg.parse::<FilterColumn>().map_err(|e| e.to_string())
}

/// Parse `name=..;phone=..;services=a,b`.
fn parse_advanced(rest: &str) -> Result<SearchQuery, String> {
    let (mut name, mut phone, mut services) = (String::new(), String::new(), String::new());
    for part in rest.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{part}'"))?;
        match key.trim() {
            "name" => name = value.to_owned(),
            "phone" => phone = value.to_owned(),
            "services" => services = value.to_owned(),
            other => return Err(format!("unknown advanced field: {other}")),
        }
    }
    Ok(SearchQuery::advanced(&name, &phone, &services))
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb {
        "help" | "?" => Command::Help,
        "" | "show" => Command::Show,
        "reload" | "retry" => Command::Reload,
        "dismiss" => Command::Dismiss,
        "term" => Command::Term(rest.to_owned()),
        "filter" => Command::Filter(column(rest)?),
        "type" => Command::Type(rest.to_owned()),
        "apply" => Command::Apply,
        "clear" => Command::Clear,
        "close" => Command::Close,
        "set" => {
            let (col, value) = rest
                .split_once(char::is_whitespace)
                .ok_or("usage: set COLUMN VALUE")?;
            Command::Set(column(col)?, value.trim().to_owned())
        }
        "unset" => Command::Unset(column(rest)?),
        "clear-all" => Command::ClearAll,
        "search" => Command::Search(SearchQuery::General(rest.to_owned())),
        "advanced" => Command::Search(parse_advanced(rest)?),
        "lookup" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .ok_or("usage: lookup FIELD VALUE")?;
            let field = field.parse::<LookupField>().map_err(|e| e.to_string())?;
            Command::Search(SearchQuery::Specific {
                field,
                value: value.trim().to_owned(),
            })
        }
        "services" => Command::Search(SearchQuery::Services(split_list(rest))),
        "add" => Command::Add,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try 'help')")),
    };
    Ok(command)
}

/// Step of the add-clinic dialog awaiting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogStep {
    ClinicId,
    Name,
    DoctorName,
    Address,
    Services,
}

#[derive(Debug)]
struct AddDialog {
    step: DialogStep,
    form: ClinicForm,
}

impl AddDialog {
    fn new() -> Self {
        let mut form = ClinicForm::new();
        form.services.clear();
        Self {
            step: DialogStep::ClinicId,
            form,
        }
    }

    fn prompt(&self) -> &'static str {
        match self.step {
            DialogStep::ClinicId => "Clinic ID: ",
            DialogStep::Name => "Clinic name: ",
            DialogStep::DoctorName => "Doctor name: ",
            DialogStep::Address => "Clinic address: ",
            DialogStep::Services => "Service NAME=PHONE (blank to submit, 'cancel' to discard): ",
        }
    }

    /// Feed one line. Returns `true` once the form is ready to submit.
    fn feed(&mut self, line: &str) -> bool {
        match self.step {
            DialogStep::ClinicId => {
                self.form.clinic_id = line.to_owned();
                self.step = DialogStep::Name;
            }
            DialogStep::Name => {
                self.form.name = line.to_owned();
                self.step = DialogStep::DoctorName;
            }
            DialogStep::DoctorName => {
                self.form.doctor_name = line.to_owned();
                self.step = DialogStep::Address;
            }
            DialogStep::Address => {
                self.form.address = line.to_owned();
                self.step = DialogStep::Services;
            }
            DialogStep::Services => {
                if line.trim().is_empty() {
                    return true;
                }
                let draft = match line.split_once('=') {
                    Some((name, phone)) => ServiceDraft::new(name, phone),
                    None => ServiceDraft::new(line, ""),
                };
                self.form.services.push(draft);
            }
        }
        false
    }
}

pub struct Session<B> {
    view: DirectoryView<B>,
    dialog: Option<AddDialog>,
    emphasis: Emphasis,
    done: bool,
}

impl<B: ClinicBackend> Session<B> {
    pub fn new(backend: B, emphasis: Emphasis) -> Self {
        Self {
            view: DirectoryView::new(backend),
            dialog: None,
            emphasis,
            done: false,
        }
    }

    pub fn view(&self) -> &DirectoryView<B> {
        &self.view
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn prompt(&self) -> &'static str {
        match &self.dialog {
            Some(dialog) => dialog.prompt(),
            None => "> ",
        }
    }

    /// Initial load, then the first render.
    pub async fn start(&mut self) -> Vec<String> {
        // Failure is rendered as the error banner.
        let _ = self.view.store_mut().load().await;
        self.render()
    }

    /// Line to show while `line` is in flight, for commands that reload the full list.
    pub fn loading_notice(&self, line: &str) -> Option<&'static str> {
        if self.dialog.is_some() {
            return None;
        }
        match parse_command(line) {
            Ok(Command::Reload | Command::ClearAll) => Some(LOADING_MESSAGE),
            _ => None,
        }
    }

    /// Current screen: error banner, filter pills, table.
    pub fn render(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(error) = self.view.store().error() {
            out.push(format!("! {error} (type 'retry')"));
        }

        let filters = self.view.filters();
        let pills: Vec<String> = FilterColumn::ALL
            .iter()
            .map(|c| format!("[{}]", filters.pill_label(*c)))
            .collect();
        out.push(pills.join(" "));

        if let FilterPanel::Editing { column, draft } = self.view.panel() {
            out.push(format!(
                "Editing {}: '{}' (type/apply/clear/close)",
                column.header(),
                draft
            ));
        }
        if !self.view.search_term().trim().is_empty() {
            out.push(format!("Search: {}", self.view.search_term().trim()));
        }

        out.push(render_table(&self.view.highlighted_rows(), self.emphasis));
        out
    }

    /// Handle one input line and return what to print.
    pub async fn handle(&mut self, line: &str) -> Vec<String> {
        if self.dialog.is_some() && line.trim() == "cancel" {
            self.dialog = None;
            return vec!["Clinic not added.".to_owned()];
        }
        if let Some(dialog) = self.dialog.as_mut() {
            if !dialog.feed(line) {
                return Vec::new();
            }
            if let Some(dialog) = self.dialog.take() {
                return self.submit(dialog.form).await;
            }
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(message) => return vec![message],
        };
        self.execute(command).await
    }

    async fn submit(&mut self, form: ClinicForm) -> Vec<String> {
        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(errors) => {
                let mut out = vec!["Clinic not added:".to_owned()];
                out.extend(
                    errors
                        .iter()
                        .map(|(field, message)| format!("  {}: {}", field.key(), message)),
                );
                return out;
            }
        };

        match self.view.store_mut().create(&payload).await {
            Ok(created) => {
                let mut out = vec![format!("Added clinic {}", created.code)];
                out.extend(self.render());
                out
            }
            Err(e) => vec![format!("Error adding clinic: {e}")],
        }
    }

    async fn execute(&mut self, command: Command) -> Vec<String> {
        match command {
            Command::Help => return vec![HELP.to_owned()],
            Command::Quit => {
                self.done = true;
                return Vec::new();
            }
            Command::Add => {
                self.dialog = Some(AddDialog::new());
                return vec!["Add clinic (type 'cancel' at any prompt to discard)".to_owned()];
            }
            Command::Show => {}
            Command::Reload => {
                let _ = self.view.store_mut().retry().await;
            }
            Command::Dismiss => self.view.store_mut().dismiss_error(),
            Command::Term(term) => self.view.set_search_term(term),
            Command::Filter(column) => self.view.toggle_filter(column),
            Command::Type(text) => {
                if self.view.panel().open_column().is_none() {
                    return vec!["No filter is open (use 'filter COLUMN')".to_owned()];
                }
                self.view.edit_filter_draft(text);
            }
            Command::Apply => {
                self.view.apply_filter_draft();
            }
            Command::Clear => {
                self.view.clear_open_filter();
            }
            Command::Close => self.view.close_filter(),
            Command::Set(column, value) => self.view.set_filter(column, value),
            Command::Unset(column) => self.view.clear_filter(column),
            Command::ClearAll => {
                let _ = self.view.clear_all_filters().await;
            }
            Command::Search(query) => match self.view.store_mut().search(&query).await {
                Ok(found) => {
                    let mut out = vec![format!("Found {found} clinic(s).")];
                    out.extend(self.render());
                    return out;
                }
                Err(e) => return vec![format!("Search failed: {e}")],
            },
        }
        self.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clinic_core::{
        constants::LOAD_ERROR_MESSAGE, ClinicError, ClinicQuery, ClinicRecord, ClinicResult,
        NewClinic, ServiceEntry,
    };
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubBackend {
        clinics: Mutex<Vec<ClinicRecord>>,
        offline: Mutex<bool>,
        requests: Mutex<Vec<String>>,
    }

    impl StubBackend {
        fn log(&self, entry: &str) {
            self.requests.lock().unwrap().push(entry.to_owned());
        }

        fn guard(&self) -> ClinicResult<()> {
            if *self.offline.lock().unwrap() {
                return Err(ClinicError::Transport("offline".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ClinicBackend for StubBackend {
        async fn fetch_clinics(&self, _query: &ClinicQuery) -> ClinicResult<Vec<ClinicRecord>> {
            self.log("fetch");
            self.guard()?;
            Ok(self.clinics.lock().unwrap().clone())
        }

        async fn add_clinic(&self, clinic: &NewClinic) -> ClinicResult<ClinicRecord> {
            self.log("add");
            self.guard()?;
            let record = ClinicRecord {
                code: clinic.clinic_code.to_string(),
                name: clinic.name.to_string(),
                ..Default::default()
            };
            self.clinics.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn search_clinics(&self, _term: &str) -> ClinicResult<Vec<ClinicRecord>> {
            self.log("search");
            self.guard()?;
            Ok(Vec::new())
        }

        async fn lookup(
            &self,
            _field: LookupField,
            _value: &str,
        ) -> ClinicResult<Vec<ClinicRecord>> {
            self.log("lookup");
            Ok(Vec::new())
        }

        async fn search_by_services(
            &self,
            _services: &[String],
        ) -> ClinicResult<Vec<ClinicRecord>> {
            self.log("services");
            Ok(Vec::new())
        }
    }

    fn session() -> Session<StubBackend> {
        let backend = StubBackend::default();
        backend.clinics.lock().unwrap().push(ClinicRecord {
            code: "C1".into(),
            name: "A".into(),
            services: vec![ServiceEntry::new("Dental", Some("5551230000".into()))],
            ..Default::default()
        });
        Session::new(backend, Emphasis::Brackets)
    }

    fn requests(session: &Session<StubBackend>) -> Vec<String> {
        session.view().store().backend().requests.lock().unwrap().clone()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("filter phone"), Ok(Command::Filter(FilterColumn::Phone)));
        assert_eq!(
            parse_command("set doctor  Dr Ng "),
            Ok(Command::Set(FilterColumn::DoctorName, "Dr Ng".into()))
        );
        assert_eq!(
            parse_command("advanced name=north; services=a, b"),
            Ok(Command::Search(SearchQuery::advanced("north", "", "a, b")))
        );
        assert!(parse_command("filter fax").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[tokio::test]
    async fn test_filter_scenario_renders_highlight_and_phone() {
        let mut session = session();
        session.start().await;

        let out = session.handle("set services dent").await.join("\n");
        assert!(out.contains("[Svc: dent]"));
        assert!(out.contains("[Dent]al"));
        assert!(out.contains("+1 (555) 123-0000"));
    }

    #[tokio::test]
    async fn test_failed_load_shows_banner_and_retry_reloads() {
        let mut session = session();
        session.start().await;
        *session.view().store().backend().offline.lock().unwrap() = true;

        let out = session.handle("reload").await.join("\n");
        assert!(out.contains(LOAD_ERROR_MESSAGE));
        assert!(out.contains("[Dent]al") || out.contains("Dental"));

        *session.view().store().backend().offline.lock().unwrap() = false;
        let out = session.handle("retry").await.join("\n");
        assert!(!out.contains(LOAD_ERROR_MESSAGE));
        assert_eq!(requests(&session), vec!["fetch", "fetch", "fetch"]);
    }

    #[tokio::test]
    async fn test_add_dialog_with_bad_phone_sends_nothing() {
        let mut session = session();
        session.start().await;

        session.handle("add").await;
        for line in ["C2", "Westfield", "Dr Ade", "9 Elm Row", "Triage=abc"] {
            assert!(session.handle(line).await.is_empty());
        }
        let out = session.handle("").await.join("\n");
        assert!(out.contains("All service phone numbers must be valid (min 10 digits)"));
        assert_eq!(requests(&session), vec!["fetch"]);
        assert_eq!(session.prompt(), "> ");
    }

    #[tokio::test]
    async fn test_add_dialog_creates_and_reloads() {
        let mut session = session();
        session.start().await;

        session.handle("add").await;
        for line in ["C2", "Westfield", "Dr Ade", "9 Elm Row", "Triage=555 222 3333"] {
            session.handle(line).await;
        }
        let out = session.handle("").await.join("\n");
        assert!(out.contains("Added clinic C2"));
        assert_eq!(requests(&session), vec!["fetch", "add", "fetch"]);
    }

    #[tokio::test]
    async fn test_cancel_discards_add_dialog() {
        let mut session = session();
        session.start().await;

        session.handle("add").await;
        session.handle("C2").await;
        session.handle("Westfield").await;
        let out = session.handle("  cancel ").await;
        assert_eq!(out, vec!["Clinic not added.".to_string()]);
        assert_eq!(session.prompt(), "> ");

        // Back at the command prompt.
        let out = session.handle("set id c1").await.join("\n");
        assert!(out.contains("[ID: c1]"));
        assert_eq!(requests(&session), vec!["fetch"]);
    }

    #[tokio::test]
    async fn test_loading_notice_only_for_full_reloads() {
        let mut session = session();
        session.start().await;

        assert_eq!(session.loading_notice("retry"), Some(LOADING_MESSAGE));
        assert_eq!(session.loading_notice("clear-all"), Some(LOADING_MESSAGE));
        assert_eq!(session.loading_notice("search dental"), None);

        session.handle("add").await;
        assert_eq!(session.loading_notice("retry"), None);
    }

    #[tokio::test]
    async fn test_panel_commands() {
        let mut session = session();
        session.start().await;

        let out = session.handle("type 555").await;
        assert_eq!(out, vec!["No filter is open (use 'filter COLUMN')".to_string()]);

        session.handle("filter phone").await;
        session.handle("type 555-1230").await;
        let out = session.handle("apply").await.join("\n");
        assert!(out.contains("[Ph: 555-1230]"));
        assert_eq!(session.view().visible_rows().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_search_reports_inline() {
        let mut session = session();
        session.start().await;

        let out = session.handle("search   ").await;
        assert_eq!(out, vec!["Search failed: Please enter a search term".to_string()]);
        assert_eq!(session.view().store().clinics().len(), 1);
    }
}
