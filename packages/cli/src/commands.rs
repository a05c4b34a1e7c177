use anyhow::{anyhow, bail, Result};
use api::{ApiError, Backend, Report, ReportPatch, ReportStatus, SearchQuery};
use client::{
    filter, newest_first, normalize_date, require_token, Choice, Outcome, RegisterStatus,
    ReportError, ReportFilter, ReportForm, ReportManager, SessionStore,
};
use store::KeyValueStore;

use crate::cli::{Cmd, ListArgs, ReportArgs, SearchArgs, UpdateArgs};

fn user_facing(err: ApiError) -> anyhow::Error {
    anyhow!(err.user_message())
}

fn report_failure(err: ReportError) -> anyhow::Error {
    match err {
        ReportError::Api(ApiError::Validation(fields)) => {
            anyhow!("Please fill all required fields: {}", fields.join(", "))
        }
        other => anyhow!(other.user_message()),
    }
}

fn finish<T>(outcome: Outcome<T>) -> Result<T> {
    match outcome {
        Outcome::Succeeded(value) => Ok(value),
        Outcome::Failed(message) => Err(anyhow!(message)),
        Outcome::Pending => bail!("request did not complete"),
    }
}

fn print_summary(records: &[Report]) {
    if records.is_empty() {
        println!("No reports.");
        return;
    }
    for r in records {
        println!(
            "{:>5}  {:<8} {:<28} {:<20} {}",
            r.id,
            r.status.as_str(),
            r.full_name,
            r.last_seen_location,
            r.last_seen_date
        );
    }
}

fn print_details(r: &Report) {
    println!("#{} {} ({})", r.id, r.full_name, r.status);
    println!("  case number:  {}", r.case_number);
    match r.age {
        Some(age) => println!("  age:          {age}"),
        None => println!("  age:          unknown"),
    }
    println!("  gender:       {}", r.gender);
    if let Some(height) = &r.height {
        println!("  height:       {height}");
    }
    println!("  last seen:    {} on {}", r.last_seen_location, r.last_seen_date);
    println!("  contact:      {} {}", r.contact_name, r.contact_phone);
    if let Some(info) = &r.additional_info {
        println!("  details:      {info}");
    }
    if let Some(photo) = &r.photo_url {
        println!("  photo:        {photo}");
    }
}

impl From<ReportArgs> for ReportForm {
    fn from(args: ReportArgs) -> Self {
        ReportForm {
            full_name: args.full_name,
            age: args.age,
            gender: args.gender,
            height: args.height,
            last_seen_location: args.location,
            last_seen_date: args.date,
            status: args.status,
            additional_info: args.info,
            photo_url: args.photo_url,
            contact_name: args.contact_name,
            contact_phone: args.contact_phone,
            case_number: args.case_number,
        }
    }
}

impl From<SearchArgs> for SearchQuery {
    fn from(args: SearchArgs) -> Self {
        SearchQuery {
            name: args.name,
            location: args.location,
            gender: args.gender,
            status: args.status,
            age_min: args.age_min,
            age_max: args.age_max,
        }
    }
}

impl UpdateArgs {
    fn into_patch(self) -> Result<ReportPatch, ApiError> {
        let last_seen_date = self.date.as_deref().map(normalize_date).transpose()?;
        Ok(ReportPatch {
            full_name: self.full_name,
            age: self.age,
            gender: self.gender,
            height: self.height,
            last_seen_location: self.location,
            last_seen_date,
            status: self.status,
            additional_info: self.info,
            photo_url: self.photo_url,
            contact_name: self.contact_name,
            contact_phone: self.contact_phone,
        })
    }
}

/// The session store and report manager behind one invocation.
pub struct App<B, S: KeyValueStore> {
    session: SessionStore<B, S>,
    reports: ReportManager<B>,
}

impl<B: Backend, S: KeyValueStore> App<B, S> {
    pub fn new(session: SessionStore<B, S>, reports: ReportManager<B>) -> Self {
        Self { session, reports }
    }

    pub async fn run(&mut self, cmd: Cmd) -> Result<()> {
        self.session.restore_session().await;

        match cmd {
            Cmd::Login { email, password } => self.login(&email, &password).await,
            Cmd::Register {
                name,
                email,
                password,
            } => self.register(&name, &email, &password).await,
            Cmd::Logout => {
                self.session.logout();
                println!("Logged out.");
                Ok(())
            }
            Cmd::Whoami => {
                match self.session.user() {
                    Some(user) if self.session.is_authenticated() => {
                        println!("{} (id {})", user.display_name(), user.id);
                    }
                    _ => println!("Not logged in."),
                }
                Ok(())
            }
            Cmd::List(args) => self.list(args).await,
            Cmd::Mine { newest } => self.mine(newest).await,
            Cmd::Show { id } => {
                let report = self.reports.get(id).await.map_err(user_facing)?;
                print_details(&report);
                Ok(())
            }
            Cmd::Search(args) => {
                let found = self
                    .reports
                    .search(&SearchQuery::from(args))
                    .await
                    .map_err(user_facing)?;
                print_summary(&found);
                Ok(())
            }
            Cmd::Find { term } => {
                let found = self.reports.quick_search(&term).await.map_err(user_facing)?;
                print_summary(&found);
                Ok(())
            }
            Cmd::Report(args) => self.submit(args).await,
            Cmd::Update { id, fields } => self.update(id, fields).await,
            Cmd::Delete { id } => self.delete(id).await,
            Cmd::Health => {
                let health = self.reports.backend().health().await.map_err(user_facing)?;
                println!(
                    "{} (database: {})",
                    health.status,
                    health.database.as_deref().unwrap_or("unknown")
                );
                if health.is_healthy() {
                    Ok(())
                } else {
                    bail!("backend is not healthy")
                }
            }
        }
    }

    async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        finish(self.session.login(email, password).await)?;
        match self.session.user() {
            Some(user) => println!("Logged in as {}.", user.display_name()),
            None => bail!("Logged in, but the session could not be validated"),
        }
        Ok(())
    }

    async fn register(&mut self, name: &str, email: &str, password: &str) -> Result<()> {
        match finish(self.session.register(name, email, password).await)? {
            RegisterStatus::SignedIn => println!("Account created, you are logged in."),
            RegisterStatus::LoginRequired => {
                println!("Account created. Run `findme login {email}` to sign in.")
            }
        }
        Ok(())
    }

    async fn list(&mut self, args: ListArgs) -> Result<()> {
        let criteria = ReportFilter {
            name_query: args.name,
            location: args.location.parse::<Choice<String>>()?,
            status: args
                .status
                .parse::<Choice<ReportStatus>>()
                .map_err(|e| anyhow!("invalid --status: {e}"))?,
        };
        let records = self.reports.list_all().await.map_err(user_facing)?;
        let mut shown = filter(&records, &criteria);
        if args.newest {
            shown = newest_first(&shown);
        }
        print_summary(&shown);
        Ok(())
    }

    async fn mine(&mut self, newest: bool) -> Result<()> {
        let token = require_token(&self.session).map_err(user_facing)?;
        let records = self.reports.list_mine(&token).await.map_err(user_facing)?;
        if newest {
            print_summary(&newest_first(&records));
        } else {
            print_summary(&records);
        }
        Ok(())
    }

    async fn submit(&mut self, args: ReportArgs) -> Result<()> {
        let token = require_token(&self.session).map_err(user_facing)?;
        let form = ReportForm::from(args);
        let created = self
            .reports
            .create(&form, &token)
            .await
            .map_err(|err| match err {
                ApiError::Validation(fields) => {
                    anyhow!("Please fill all required fields: {}", fields.join(", "))
                }
                other => user_facing(other),
            })?;
        match created.id {
            Some(id) => println!("Report submitted (id {id})."),
            None => println!("Report submitted."),
        }
        Ok(())
    }

    async fn update(&mut self, id: api::ReportId, fields: UpdateArgs) -> Result<()> {
        let token = require_token(&self.session).map_err(user_facing)?;
        let patch = fields.into_patch().map_err(user_facing)?;
        if patch.is_empty() {
            bail!("Nothing to update");
        }
        self.reports.list_mine(&token).await.map_err(user_facing)?;
        self.reports
            .update(id, &patch, &token)
            .await
            .map_err(report_failure)?;
        if let Some(report) = self.reports.collection().get(id) {
            print_details(report);
        }
        Ok(())
    }

    async fn delete(&mut self, id: api::ReportId) -> Result<()> {
        let token = require_token(&self.session).map_err(user_facing)?;
        self.reports.list_mine(&token).await.map_err(user_facing)?;
        self.reports.delete(id, &token).await.map_err(report_failure)?;
        println!("Report {id} deleted.");
        Ok(())
    }
}
