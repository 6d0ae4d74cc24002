use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::{CatalogManager, CatalogView, Filter};
use crate::config::{AppConfig, ImageLimits, DATA_DIR_ENV};
use crate::cover;
use crate::error::{CatalogError, Result};
use crate::local_storage::LocalStorage;
use crate::models::{BookDraft, BookStatus};
use crate::render::{sanitize_line, Rendered, ViewMode};
use crate::session::Session;
use crate::store::SqliteStore;

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "Personal book catalog")]
struct Cli {
  /// Where bookshelf.db lives
  #[arg(long, global = true, env = DATA_DIR_ENV)]
  data_dir: Option<PathBuf>,
  /// Print HTML fragments instead of text
  #[arg(long, global = true, default_value_t = false)]
  html: bool,
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  Register {
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    confirm: String,
  },
  Login {
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
  },
  Logout,
  Whoami,
  List {
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long)]
    category: Option<String>,
    #[arg(long, value_enum, default_value_t = ViewModeCli::Grid)]
    view: ViewModeCli,
  },
  Show {
    id: i64,
  },
  Read {
    id: i64,
  },
  Add(BookArgs),
  Edit {
    id: i64,
  },
  /// Changes only the fields given; everything else keeps its stored value
  Update {
    id: i64,
    #[command(flatten)]
    changes: UpdateArgs,
  },
  Remove {
    id: i64,
    /// Skip the confirmation prompt
    #[arg(long, default_value_t = false)]
    yes: bool,
  },
  Stats,
}

#[derive(Args)]
struct BookArgs {
  #[arg(long)]
  title: String,
  #[arg(long)]
  author: String,
  #[arg(long)]
  category: String,
  /// Negative for BCE
  #[arg(long, allow_hyphen_values = true)]
  year: i32,
  #[arg(long, value_enum, default_value_t = StatusCli::Available)]
  status: StatusCli,
  /// Cover picture, at most 2 MB
  #[arg(long)]
  image: Option<PathBuf>,
  #[arg(long)]
  quantity: Option<i64>,
  #[arg(long)]
  content: Option<String>,
}

impl BookArgs {
  /// A rejected picture is reported and dropped; the book is still saved.
  fn into_draft(self, limits: &ImageLimits) -> BookDraft {
    let image = self
      .image
      .as_deref()
      .and_then(|path| load_cover(path, limits))
      .unwrap_or_default();
    BookDraft {
      title: self.title,
      author: self.author,
      category: self.category,
      year: self.year,
      status: self.status.into(),
      image,
      quantity: self.quantity,
      content: self.content,
    }
  }
}

#[derive(Args)]
struct UpdateArgs {
  #[arg(long)]
  title: Option<String>,
  #[arg(long)]
  author: Option<String>,
  #[arg(long)]
  category: Option<String>,
  #[arg(long, allow_hyphen_values = true)]
  year: Option<i32>,
  #[arg(long, value_enum)]
  status: Option<StatusCli>,
  /// New cover picture, at most 2 MB
  #[arg(long)]
  image: Option<PathBuf>,
  #[arg(long)]
  quantity: Option<i64>,
  #[arg(long)]
  content: Option<String>,
}

impl UpdateArgs {
  /// Overlays the given flags on the edit form's current values.
  fn apply(self, mut draft: BookDraft, limits: &ImageLimits) -> BookDraft {
    if let Some(title) = self.title {
      draft.title = title;
    }
    if let Some(author) = self.author {
      draft.author = author;
    }
    if let Some(category) = self.category {
      draft.category = category;
    }
    if let Some(year) = self.year {
      draft.year = year;
    }
    if let Some(status) = self.status {
      draft.status = status.into();
    }
    if let Some(image) = self
      .image
      .as_deref()
      .and_then(|path| load_cover(path, limits))
    {
      draft.image = image;
    }
    if self.quantity.is_some() {
      draft.quantity = self.quantity;
    }
    if self.content.is_some() {
      draft.content = self.content;
    }
    draft
  }
}

fn load_cover(path: &Path, limits: &ImageLimits) -> Option<String> {
  match cover::ingest_file(path, limits) {
    Ok(data_url) => Some(data_url),
    Err(err) => {
      log::warn!("cover skipped for {}: {}", path.display(), err);
      eprintln!("{}", err);
      None
    }
  }
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewModeCli {
  Grid,
  List,
}

impl From<ViewModeCli> for ViewMode {
  fn from(value: ViewModeCli) -> Self {
    match value {
      ViewModeCli::Grid => ViewMode::Grid,
      ViewModeCli::List => ViewMode::List,
    }
  }
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusCli {
  Available,
  Unavailable,
  Upcoming,
}

impl From<StatusCli> for BookStatus {
  fn from(value: StatusCli) -> Self {
    match value {
      StatusCli::Available => BookStatus::Available,
      StatusCli::Unavailable => BookStatus::Unavailable,
      StatusCli::Upcoming => BookStatus::Upcoming,
    }
  }
}

struct TerminalView<'a> {
  html: bool,
  assume_yes: bool,
  input: &'a mut dyn BufRead,
}

impl CatalogView for TerminalView<'_> {
  fn render(&mut self, rendered: &Rendered) {
    if self.html {
      println!("{}", rendered.to_html());
    } else {
      print!("{}", rendered.to_text());
    }
  }

  fn notify(&mut self, message: &str) {
    eprintln!("{}", message);
  }

  fn confirm(&mut self, prompt: &str) -> bool {
    if self.assume_yes {
      return true;
    }
    eprint!("{} [y/N] ", sanitize_line(prompt));
    let _ = io::stderr().flush();
    let mut answer = String::new();
    if self.input.read_line(&mut answer).is_err() {
      return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
  }
}

fn init_logging() {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  let _ = tracing_subscriber::registry()
    .with(env_filter)
    .with(
      tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false),
    )
    .try_init();
}

pub fn run() -> ExitCode {
  init_logging();
  let cli = Cli::parse();
  match execute(cli, &mut io::stdin().lock()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      log::error!("{}", err);
      eprintln!("{}", err);
      ExitCode::FAILURE
    }
  }
}

/// `input` answers confirmation prompts.
fn execute(cli: Cli, input: &mut dyn BufRead) -> Result<()> {
  let config = AppConfig::resolve(cli.data_dir)?;
  let session = Session::new(LocalStorage::open(&config.db_path())?);

  match cli.command {
    Commands::Register {
      username,
      password,
      confirm,
    } => {
      session.register(&username, &password, &confirm)?;
      eprintln!("✅ Registered, you can log in now");
    }
    Commands::Login { username, password } => {
      session.login(&username, &password)?;
      eprintln!("✅ Logged in as {}", username);
    }
    Commands::Logout => {
      session.logout()?;
      eprintln!("Logged out");
    }
    Commands::Whoami => match session.current_user()? {
      Some(user) => println!("{}", sanitize_line(&user)),
      None => println!("not logged in"),
    },
    command => {
      if !session.is_logged_in()? {
        return Err(CatalogError::AuthFailed("Please log in first".to_string()));
      }
      run_catalog(command, &config, cli.html, input)?;
    }
  }
  Ok(())
}

fn run_catalog(
  command: Commands,
  config: &AppConfig,
  html: bool,
  input: &mut dyn BufRead,
) -> Result<()> {
  let assume_yes = matches!(command, Commands::Remove { yes: true, .. });
  let mode = match &command {
    Commands::List { view, .. } => ViewMode::from(*view),
    _ => ViewMode::default(),
  };

  let store = SqliteStore::open_or_create(&config.db_path())?;
  let view = TerminalView {
    html,
    assume_yes,
    input,
  };
  let mut catalog = CatalogManager::new(store, view).with_view_mode(mode);
  catalog.load()?;

  match command {
    Commands::List {
      search, category, ..
    } => {
      let shown = catalog.apply_filters(Filter {
        query: search,
        category,
      });
      log::info!("{} of {} books shown", shown, catalog.books().len());
    }
    Commands::Show { id } => {
      let detail = catalog.show_detail(id)?;
      if html {
        println!("{}", detail.to_html());
      } else {
        print!("{}", detail.to_text());
      }
    }
    Commands::Read { id } => {
      if html {
        println!("{}", catalog.read(id)?);
      } else {
        println!("{}", catalog.read_text(id)?);
      }
    }
    Commands::Add(book) => {
      let id = catalog.add(book.into_draft(&config.images))?;
      eprintln!("id: {}", id);
    }
    Commands::Edit { id } => {
      let form = catalog.edit(id)?;
      println!("id:       {}", form.id);
      println!("title:    {}", sanitize_line(&form.fields.title));
      println!("author:   {}", sanitize_line(&form.fields.author));
      println!("category: {}", sanitize_line(&form.fields.category));
      println!("year:     {}", form.fields.year);
      println!("status:   {}", form.fields.status);
      println!(
        "quantity: {}",
        form
          .fields
          .quantity
          .map(|value| value.to_string())
          .unwrap_or_default()
      );
      println!(
        "image:    {}",
        if form.fields.image.is_empty() {
          "none"
        } else {
          "current image kept unless --image is given"
        }
      );
    }
    Commands::Update { id, changes } => {
      let form = catalog.edit(id)?;
      catalog.update(id, changes.apply(form.fields, &config.images))?;
    }
    Commands::Remove { id, .. } => {
      if !catalog.remove(id)? {
        eprintln!("Nothing deleted");
      }
    }
    Commands::Stats => {
      let stats = catalog.stats();
      println!("Books:       {}", stats.total_books);
      println!("Categories:  {}", stats.total_categories);
      println!("Newest year: {}", stats.newest_year_label());
    }
    Commands::Register { .. } | Commands::Login { .. } | Commands::Logout | Commands::Whoami => {}
  }
  Ok(())
}
