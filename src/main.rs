use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use devhub::{
    AppState,
    api::operations::{
        AiOperations, ApiUserSearch, AuthOperations, PostOperations, SnippetOperations,
    },
    api::schema::{AiResult, ListQuery, ResultSection, SUMMARY_CHARS},
    clipboard::{SystemClipboard, copy_section},
    config::Config,
    error::{ClientError, Result},
    forms::{CodeGenerationForm, CodeInputForm, FixBugForm, LoginForm, RegisterForm},
    router::{Navigation, navigate},
    search::{DebouncedSearch, SearchEvent},
    utils::truncate_chars,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "devhub", about = "DevHub developer community client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 登录并保存会话
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// 显示当前登录用户
    Whoami,
    Posts {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    Snippets {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        language: Option<String>,
    },
    /// 搜索用户（与页面相同的防抖逻辑）
    Search { query: String },
    /// 解释代码，未指定文件时从标准输入读取
    Explain {
        #[arg(long, short)]
        language: String,
        file: Option<PathBuf>,
        #[arg(long)]
        copy: bool,
    },
    Fix {
        #[arg(long, short)]
        language: String,
        #[arg(long)]
        error: Option<String>,
        file: Option<PathBuf>,
        #[arg(long)]
        copy: bool,
    },
    Generate {
        #[arg(long, short)]
        language: String,
        description: String,
        #[arg(long)]
        copy: bool,
    },
    /// 检查某个页面路径在当前会话下的跳转结果
    Navigate { path: String },
}

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::debug!("Command failed: {}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // 加载配置并恢复上一次的会话
    let config = Config::from_env()?;
    let state = AppState::open(config)?;

    match cli.command {
        Command::Login { email, password } => {
            let route = AuthOperations::login(&state, &LoginForm { email, password }).await?;
            print_user(&state);
            println!("-> {}", route);
        }
        Command::Register {
            name,
            username,
            email,
            password,
        } => {
            let form = RegisterForm {
                name,
                username,
                email,
                confirm_password: password.clone(),
                password,
            };
            let route = AuthOperations::register(&state, &form).await?;
            print_user(&state);
            println!("-> {}", route);
        }
        Command::Logout => {
            let route = AuthOperations::logout(&state).await?;
            println!("Signed out -> {}", route);
        }
        Command::Whoami => print_user(&state),
        Command::Posts { search, tag } => {
            let query = ListQuery {
                search,
                tag,
                ..ListQuery::default()
            };
            for post in PostOperations::list(&state, &query).await? {
                println!(
                    "{}  {}  by {}  [{}]",
                    post.id,
                    post.title,
                    post.author.display_name(),
                    post.tags.join(", ")
                );
                println!("    {}", post.summary(SUMMARY_CHARS));
            }
        }
        Command::Snippets { search, language } => {
            let query = ListQuery {
                search,
                language,
                ..ListQuery::default()
            };
            for snippet in SnippetOperations::list(&state, &query).await? {
                println!(
                    "{}  {} ({}, {} lines)",
                    snippet.id,
                    snippet.title,
                    snippet.language,
                    snippet.line_count()
                );
            }
        }
        Command::Search { query } => search(&state, &query).await?,
        Command::Explain {
            language,
            file,
            copy,
        } => {
            let form = CodeInputForm {
                code: read_source(file)?,
                language,
            };
            let result = AiOperations::explain_code(&state, &form).await?;
            print_result(&result, copy)?;
        }
        Command::Fix {
            language,
            error,
            file,
            copy,
        } => {
            let form = FixBugForm {
                code: read_source(file)?,
                language,
                error_message: error,
            };
            let result = AiOperations::fix_bug(&state, &form).await?;
            print_result(&result, copy)?;
        }
        Command::Generate {
            language,
            description,
            copy,
        } => {
            let form = CodeGenerationForm {
                description,
                language,
            };
            let result = AiOperations::generate_code(&state, &form).await?;
            print_result(&result, copy)?;
        }
        Command::Navigate { path } => match navigate(&path, &state.auth) {
            Navigation::Render(route) => println!("render {}", route),
            Navigation::Redirect(route) => println!("redirect {}", route),
        },
    }
    Ok(())
}

async fn search(state: &AppState, query: &str) -> Result<()> {
    let (mut search, mut events) = DebouncedSearch::new(
        Arc::new(ApiUserSearch::new(state)),
        state.config.search_debounce(),
        state.config.search_min_chars,
    );
    search.input(query);

    match events.recv().await {
        Some(SearchEvent::Results { users, .. }) if users.is_empty() => println!("No users found"),
        Some(SearchEvent::Results { users, .. }) => {
            for user in users {
                println!("@{}  {}", user.username, user.name);
            }
        }
        Some(SearchEvent::Failed { message, .. }) => eprintln!("{}", message),
        Some(SearchEvent::Cleared) | None => println!(
            "Type at least {} characters to search",
            state.config.search_min_chars
        ),
    }
    Ok(())
}

fn read_source(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| ClientError::Config(format!("Cannot read {}: {}", path.display(), e))),
        None => {
            let mut code = String::new();
            std::io::stdin()
                .read_to_string(&mut code)
                .map_err(|e| ClientError::Config(format!("Cannot read stdin: {}", e)))?;
            Ok(code)
        }
    }
}

fn print_user(state: &AppState) {
    match state.auth.current_user() {
        Some(user) => {
            let badge = if user.has_admin_rights() { " (admin)" } else { "" };
            println!("{} <{}> @{}{}", user.name, user.email, user.username, badge);
        }
        None => println!("Not signed in"),
    }
}

fn print_result(result: &AiResult, copy: bool) -> Result<()> {
    let sections = [
        ("Explanation", ResultSection::Explanation),
        ("Issues", ResultSection::Issues),
        ("Code", ResultSection::Code),
        ("Suggestions", ResultSection::Suggestions),
        ("Improvements", ResultSection::Improvements),
    ];
    for (title, section) in sections {
        if let Some(text) = result.section_text(section) {
            println!("## {}\n{}\n", title, text);
        }
    }
    if let Some(complexity) = &result.complexity {
        println!("Complexity: {}", truncate_chars(complexity, 120));
    }

    if copy {
        let Some(clipboard) = SystemClipboard::detect() else {
            eprintln!("No clipboard tool found (wl-copy, xclip or pbcopy)");
            return Ok(());
        };
        let section = if result.code.is_some() {
            ResultSection::Code
        } else {
            ResultSection::Explanation
        };
        if copy_section(&clipboard, result, section)? {
            eprintln!("Copied to clipboard");
        }
    }
    Ok(())
}
