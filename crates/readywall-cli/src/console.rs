//! Command dispatch against the configured gateway

use crate::drafts::{self, DraftFile};
use crate::output;
use crate::screens::Screen;
use crate::{Commands, DraftArgs, InquiryCommand, ListArgs, RecordCommand, UserCommand};
use anyhow::{Result, anyhow, bail};
use readywall_client::entities::{Activation, BlogDraft, InquiryDraft, LeadDraft, ProductDraft};
use readywall_client::{
    CarouselCursors, Credentials, DashboardAggregator, DeleteOutcome, DeleteWorkflow,
    FileTokenStore, FormWorkflow, Gateway, GatewayError, ListController, ListQuery, NoticeLevel,
    Notices, Route, RouteDecision, Session, SessionGuard, StatusField, StatusOutcome,
    StatusWorkflow, SubmitOutcome, TokenStore, auth,
};
use readywall_core::utils::resolve_image_url;
use readywall_core::{Config, InquiryStatus, RecordId, User};
use tracing::{debug, info};

/// Turn a gateway error into the message the operator sees
fn failure(error: GatewayError) -> anyhow::Error {
    if error.is_auth_failure() {
        anyhow!("{} Run `readywall-admin login` to sign in.", error.user_message())
    } else {
        anyhow!(error.user_message())
    }
}

/// One invocation of the admin console
pub struct Console {
    config: Config,
    gateway: Gateway,
    store: FileTokenStore,
    json: bool,
    notices: Notices,
}

impl Console {
    /// Console for `config`, printing JSON when `json` is set
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config, json: bool) -> Result<Self> {
        let gateway = Gateway::from_config(&config.gateway).map_err(failure)?;
        let store = FileTokenStore::new(config.session.token_file.clone());
        Ok(Self {
            config,
            gateway,
            store,
            json,
            notices: Notices::new(),
        })
    }

    /// Print pending success and info notices; errors surface as the command's result
    pub fn flush_notices(&mut self) {
        for notice in self.notices.drain() {
            if notice.level != NoticeLevel::Error {
                output::notice(&notice);
            }
        }
    }

    /// Run one command
    ///
    /// # Errors
    ///
    /// Returns an error if the session guard redirects or the command fails.
    pub async fn run(&mut self, route: Option<Route>, command: Commands) -> Result<()> {
        match command {
            Commands::Login { email, password } => self.login(email, password).await,
            Commands::Config => self.show_config(),
            command => {
                let session = self.guard(route.unwrap_or(Route::Dashboard)).await?;
                self.run_screen(&session, command).await
            }
        }
    }

    async fn run_screen(&mut self, session: &Session, command: Commands) -> Result<()> {
        match command {
            Commands::Logout => self.logout().await,
            Commands::Whoami => self.whoami(session),
            Commands::Dashboard => self.dashboard(session).await,
            Commands::Leads { action } => self.records::<LeadDraft>(session, action).await,
            Commands::Products { action } => self.records::<ProductDraft>(session, action).await,
            Commands::Blogs { action } => self.records::<BlogDraft>(session, action).await,
            Commands::Inquiries { action } => match action {
                InquiryCommand::Record(action) => self.records::<InquiryDraft>(session, action).await,
                InquiryCommand::Status { id, status } => {
                    let status: InquiryStatus = status.parse()?;
                    self.change_status::<readywall_core::Inquiry>(session, &id, |_| status)
                        .await
                }
            },
            Commands::Users { action } => match action {
                UserCommand::List(args) => self.list::<User>(session, args).await,
                UserCommand::Activate { id } => {
                    self.change_status::<User>(session, &id, |_| Activation::Active)
                        .await
                }
                UserCommand::Deactivate { id } => {
                    self.change_status::<User>(session, &id, |_| Activation::Inactive)
                        .await
                }
                UserCommand::Toggle { id } => {
                    self.change_status::<User>(session, &id, |user| user.status().toggled())
                        .await
                }
            },
            Commands::Login { .. } | Commands::Config => Ok(()),
        }
    }

    async fn guard(&self, route: Route) -> Result<Session> {
        let session = self.store.load().await?;
        match SessionGuard::check(route, session.as_ref()) {
            RouteDecision::Render(_) => Ok(session.unwrap_or_else(Session::anonymous)),
            RouteDecision::Redirect(target) => {
                debug!(%route, %target, "session guard redirected");
                bail!("Not signed in. Run `readywall-admin login` first.")
            }
        }
    }

    // Session commands

    async fn login(&mut self, email: String, password: String) -> Result<()> {
        let credentials = Credentials::new(email, password);
        let session = auth::login(&self.gateway, &self.store, &credentials)
            .await
            .map_err(failure)?;
        info!(path = %self.store.path().display(), "session stored");

        match session.user() {
            Some(user) => self
                .notices
                .success(format!("Signed in as {} <{}>", user.name, user.email)),
            None => self.notices.success("Signed in"),
        }
        if self.json {
            output::json(&session.user())?;
        }
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        auth::logout(&self.store).await?;
        self.notices.success("Signed out");
        Ok(())
    }

    fn whoami(&self, session: &Session) -> Result<()> {
        if self.json {
            return output::json(&session.user());
        }
        match session.user() {
            Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
            None => println!("Signed in; no profile stored"),
        }
        Ok(())
    }

    async fn dashboard(&self, session: &Session) -> Result<()> {
        let view = DashboardAggregator::new(self.config.dashboard.recent_leads)
            .load(&self.gateway, session)
            .await;
        if self.json {
            output::json(&view)
        } else {
            output::dashboard(&view);
            Ok(())
        }
    }

    fn show_config(&self) -> Result<()> {
        let rendered = toml::to_string_pretty(&self.config)
            .map_err(|e| anyhow!("failed to serialize configuration: {e}"))?;
        println!("{rendered}");
        Ok(())
    }

    // Record screens

    async fn records<D>(&mut self, session: &Session, action: RecordCommand) -> Result<()>
    where
        D: DraftFile,
        D::Record: Screen,
    {
        match action {
            RecordCommand::List(args) => self.list::<D::Record>(session, args).await,
            RecordCommand::Show { id, image } => {
                self.show::<D::Record>(session, &id, image).await
            }
            RecordCommand::Create(args) => self.create::<D>(session, args).await,
            RecordCommand::Update { id, draft } => self.update::<D>(session, &id, draft).await,
            RecordCommand::Delete { id, yes } => self.delete::<D::Record>(session, &id, yes).await,
        }
    }

    async fn load<E: Screen>(&self, session: &Session, query: ListQuery) -> Result<ListController<E>> {
        let mut list = ListController::with_query(query);
        list.load(&self.gateway, session).await;
        if let Some(error) = list.error() {
            bail!("{error}");
        }
        Ok(list)
    }

    async fn list<E: Screen>(&self, session: &Session, args: ListArgs) -> Result<()> {
        let mut list = self.load::<E>(session, args.query()).await?;
        if let Some(term) = args.search {
            list.set_search_term(term);
        }
        if let Some(filter) = args.filter {
            list.set_status_filter(&filter);
        }

        let items = list.filtered_items();
        if self.json {
            return output::json(&items);
        }

        let rows: Vec<Vec<String>> = items.iter().map(|item| item.row()).collect();
        output::table(E::COLUMNS, &rows);
        println!();
        println!("{}", list.summary());
        let counts = list.filter_counts();
        if !counts.is_empty() {
            output::counts(&counts);
        }
        Ok(())
    }

    async fn show<E: Screen>(&self, session: &Session, id: &str, image: Option<i64>) -> Result<()> {
        let list = self.load::<E>(session, ListQuery::default()).await?;
        let id = RecordId::from(id);
        let record = list
            .load_detail(&self.gateway, session, &id)
            .await
            .map_err(|e| match e {
                GatewayError::Unsupported { .. } => anyhow!("No {} with id {id}", E::NAME),
                other => failure(other),
            })?;

        if self.json {
            return output::json(&record);
        }
        output::detail(&serde_json::to_value(&record)?);

        let gallery = record.gallery_refs();
        if !gallery.is_empty() {
            let mut cursors = CarouselCursors::new();
            if let Some(position) = image {
                cursors.set(&id, position);
            }
            let index = cursors.index(&id, gallery.len()).unwrap_or_default();
            let url = cursors
                .current(&id, &gallery)
                .and_then(|reference| {
                    resolve_image_url(self.config.gateway.asset_base_url(), reference)
                })
                .unwrap_or_default();
            println!();
            println!("Image {} of {}: {url}", index + 1, gallery.len());
        }
        Ok(())
    }

    async fn create<D>(&mut self, session: &Session, args: DraftArgs) -> Result<()>
    where
        D: DraftFile,
        D::Record: Screen,
    {
        let patch = drafts::read_patch(&args.draft).await?;
        let images = drafts::load_images(&args.images, &self.config.uploads).await?;

        let mut form = FormWorkflow::<D>::new();
        form.open_create();
        let mut fields = drafts::overlay(form.fields(), patch)?;
        fields.attach_images(images)?;
        *form.fields_mut() = fields;

        let mut list = ListController::<D::Record>::new();
        let outcome = form
            .submit(&self.gateway, session, &mut list, &mut self.notices)
            .await;
        self.submitted(outcome)
    }

    async fn update<D>(&mut self, session: &Session, id: &str, args: DraftArgs) -> Result<()>
    where
        D: DraftFile,
        D::Record: Screen,
    {
        let patch = drafts::read_patch(&args.draft).await?;
        let images = drafts::load_images(&args.images, &self.config.uploads).await?;

        let mut list = self.load::<D::Record>(session, ListQuery::default()).await?;
        let id = RecordId::from(id);
        let record = list
            .load_detail(&self.gateway, session, &id)
            .await
            .map_err(failure)?;

        let mut form = FormWorkflow::<D>::new();
        form.open_edit(&record);
        let mut fields = drafts::overlay(form.fields(), patch)?;
        fields.attach_images(images)?;
        *form.fields_mut() = fields;

        let outcome = form
            .submit(&self.gateway, session, &mut list, &mut self.notices)
            .await;
        self.submitted(outcome)
    }

    fn submitted<E: Screen>(&self, outcome: SubmitOutcome<E>) -> Result<()> {
        match outcome {
            SubmitOutcome::Saved(record) => self.print_record(&record),
            SubmitOutcome::Accepted | SubmitOutcome::Discarded => Ok(()),
            SubmitOutcome::Invalid(errors) => {
                for (field, message) in errors.iter() {
                    eprintln!("  {field}: {message}");
                }
                bail!("Please fix the errors in the form")
            }
            SubmitOutcome::Failed(message) => Err(anyhow!(message)),
            SubmitOutcome::Busy | SubmitOutcome::NotOpen => {
                bail!("{} form was not submitted", E::NAME)
            }
        }
    }

    async fn delete<E: Screen>(&mut self, session: &Session, id: &str, confirmed: bool) -> Result<()> {
        let mut list = self.load::<E>(session, ListQuery::default()).await?;
        let id = RecordId::from(id);
        let Some(record) = list.find(&id).cloned() else {
            bail!("No {} with id {id}", E::NAME);
        };

        let mut workflow = DeleteWorkflow::new();
        workflow.request_delete(&record);
        if !confirmed {
            println!("Would delete {} {id}: {}", E::NAME, record.row().join("  "));
            workflow.cancel_delete();
            self.notices.info("Nothing deleted; pass --yes to confirm");
            return Ok(());
        }

        match workflow
            .confirm_delete(&self.gateway, session, &mut list, &mut self.notices)
            .await
        {
            DeleteOutcome::Failed(message) => Err(anyhow!(message)),
            DeleteOutcome::Deleted(_)
            | DeleteOutcome::NothingPending
            | DeleteOutcome::Busy
            | DeleteOutcome::Discarded => Ok(()),
        }
    }

    /// `choose` picks the new status from the record as currently listed
    async fn change_status<E>(
        &mut self,
        session: &Session,
        id: &str,
        choose: impl FnOnce(&E) -> E::Status,
    ) -> Result<()>
    where
        E: StatusField + Screen,
    {
        let mut list = self.load::<E>(session, ListQuery::default()).await?;
        let id = RecordId::from(id);
        let Some(record) = list.find(&id) else {
            bail!("No {} with id {id}", E::NAME);
        };
        let status = choose(record);

        let outcome = StatusWorkflow::new()
            .change(&self.gateway, session, &mut list, &mut self.notices, &id, status)
            .await;
        match outcome {
            StatusOutcome::Changed(_) => match list.find(&id) {
                Some(record) => self.print_record(record),
                None => Ok(()),
            },
            StatusOutcome::Failed(message) => Err(anyhow!(message)),
            StatusOutcome::Busy | StatusOutcome::Discarded => Ok(()),
        }
    }

    fn print_record<E: Screen>(&self, record: &E) -> Result<()> {
        if self.json {
            output::json(record)
        } else {
            output::table(E::COLUMNS, &[record.row()]);
            Ok(())
        }
    }
}
