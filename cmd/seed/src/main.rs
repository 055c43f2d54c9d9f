//! Development seeder.
//!
//! Populates a Postgres instance with demo accounts, a small catalog, two
//! clubs, and enough posts to light up the home feed. Everything flows
//! through the real service engines so seeded data obeys the same rules as
//! live traffic. Safe to rerun; pass `--reset` to wipe the tables first.

use std::sync::Arc;

use anyhow::Context;
use auth_adapters::{Argon2CredentialHasher, JwtTokenIssuer};
use configs::Settings;
use domains::{AppError, User, UserRepo};
use secrecy::ExposeSecret;
use services::{
    AccountService, CatalogService, FeedService, MembershipService, NewAccount, NewBook, NewClub,
    ReviewService, ShelfService,
};
use storage_adapters::{MemoryMediaStore, PgStore};
use tracing::info;
use uuid::Uuid;

const SEED_PASSWORD: &str = "lumiread";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load().context("loading configuration")?;
    let store = Arc::new(
        PgStore::connect(
            settings.database.url.expose_secret(),
            settings.database.max_connections,
        )
        .await
        .context("connecting to postgres")?,
    );

    if std::env::args().any(|a| a == "--reset") {
        sqlx::query("TRUNCATE club_posts, book_clubs, books, users")
            .execute(store.pool())
            .await
            .context("truncating tables")?;
        info!("existing data cleared");
    }

    let hasher = Arc::new(Argon2CredentialHasher::new());
    let tokens = Arc::new(JwtTokenIssuer::new(
        settings.auth.jwt_secret.expose_secret().as_bytes(),
        settings.auth.token_ttl_hours,
    ));
    // Seeded posts carry no images, so a throwaway media store is fine.
    let media = Arc::new(MemoryMediaStore::new());

    let accounts = AccountService::new(store.clone(), hasher, tokens);
    let membership = MembershipService::new(store.clone(), store.clone());
    let feed = FeedService::new(store.clone(), store.clone(), store.clone(), media);
    let reviews = ReviewService::new(store.clone(), store.clone());
    let catalog = CatalogService::new(store.clone());
    let shelf = ShelfService::new(store.clone(), store.clone());

    let ada = ensure_account(&accounts, store.as_ref(), "Ada Chapterhouse", "ada").await?;
    let ben = ensure_account(&accounts, store.as_ref(), "Ben Margin", "ben").await?;
    let caro = ensure_account(&accounts, store.as_ref(), "Caro Spine", "caro").await?;

    let books = [
        (
            "978-0441478125",
            "The Left Hand of Darkness",
            "Ursula K. Le Guin",
            1969,
            "science fiction",
        ),
        ("978-0441172719", "Dune", "Frank Herbert", 1965, "science fiction"),
        ("978-0553283686", "Hyperion", "Dan Simmons", 1989, "science fiction"),
        ("978-0156907393", "To the Lighthouse", "Virginia Woolf", 1927, "modernist"),
    ];
    for (ibn, title, author, year, genre) in books {
        ensure_book(&catalog, ada.id, ibn, title, author, year, genre).await?;
    }

    reviews
        .add_or_update("978-0441478125", ada.id, 5, "Genly Ai deserved better.".into())
        .await?;
    reviews
        .add_or_update("978-0441478125", ben.id, 4, "Slow start, perfect ending.".into())
        .await?;
    reviews
        .add_or_update("978-0441172719", caro.id, 5, "The spice must flow.".into())
        .await?;

    tolerate_conflict(shelf.add(ada.id, "978-0441172719").await)?;
    tolerate_conflict(shelf.add(ben.id, "978-0553283686").await)?;

    let (fellowship, fresh) = ensure_club(
        &membership,
        ada.id,
        NewClub {
            name: "Fellowship of the Page".into(),
            description: "One chapter a night, no exceptions.".into(),
            avatar: String::new(),
            privacy: "public".into(),
        },
    )
    .await?;
    if fresh {
        membership.join_public(fellowship, ben.id).await?;
        membership.join_public(fellowship, caro.id).await?;

        let post = feed
            .create_post(
                fellowship,
                ben.id,
                "Finished The Left Hand of Darkness. Still thinking about the ice crossing."
                    .into(),
                Some("le-guin, winter".into()),
                None,
            )
            .await?;
        feed.add_comment(post.id, caro.id, "The chapter on kemmer rewired my brain.".into())
            .await?;
        feed.toggle_like(post.id, ada.id).await?;
        feed.toggle_like(post.id, caro.id).await?;

        feed.create_post(
            fellowship,
            ada.id,
            "Next pick: Hyperion. Shrike content warning applies.".into(),
            Some("announcement".into()),
            None,
        )
        .await?;
    }

    let (quiet_room, fresh) = ensure_club(
        &membership,
        caro.id,
        NewClub {
            name: "The Quiet Room".into(),
            description: "Slow reads, long silences.".into(),
            avatar: String::new(),
            privacy: "private".into(),
        },
    )
    .await?;
    if fresh {
        membership.request_to_join(quiet_room, ben.id).await?;
        membership.accept_request(quiet_room, ben.id).await?;

        feed.create_post(
            quiet_room,
            caro.id,
            "Woolf in winter starts Monday.".into(),
            None,
            None,
        )
        .await?;
    }

    info!(
        users = 3,
        books = books.len(),
        "seed complete; log in as ada/ben/caro with password {SEED_PASSWORD:?}"
    );
    Ok(())
}

/// Registers the account, or loads it when a previous run already did.
async fn ensure_account(
    accounts: &AccountService,
    store: &PgStore,
    name: &str,
    username: &str,
) -> anyhow::Result<User> {
    match accounts
        .register(NewAccount {
            name: name.into(),
            username: username.into(),
            email: format!("{username}@lumiread.local"),
            password: SEED_PASSWORD.into(),
            bio: None,
            age: None,
        })
        .await
    {
        Ok(user) => {
            info!(%username, "account created");
            Ok(user)
        }
        Err(AppError::Conflict(_)) => store
            .get_by_username(username)
            .await?
            .context("seeded account vanished mid-run"),
        Err(e) => Err(e.into()),
    }
}

async fn ensure_book(
    catalog: &CatalogService,
    added_by: Uuid,
    ibn: &str,
    title: &str,
    author: &str,
    year: i32,
    genre: &str,
) -> anyhow::Result<()> {
    let result = catalog
        .add_book(
            added_by,
            NewBook {
                ibn: ibn.into(),
                title: title.into(),
                author: author.into(),
                language: "en".into(),
                cover_img: String::new(),
                description: String::new(),
                buy_url: String::new(),
                year: Some(year),
                genre: vec![genre.into()],
            },
        )
        .await;
    match result {
        Ok(_) => {
            info!(%ibn, %title, "book cataloged");
            Ok(())
        }
        Err(AppError::Conflict(_)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Creates the club unless one of the same name already exists. Returns
/// the club id and whether it was created by this run.
async fn ensure_club(
    membership: &MembershipService,
    creator: Uuid,
    input: NewClub,
) -> anyhow::Result<(Uuid, bool)> {
    let existing = membership
        .directory(creator)
        .await?
        .into_iter()
        .find(|c| c.name == input.name);
    if let Some(club) = existing {
        return Ok((club.id, false));
    }
    let club = membership.create_club(creator, input).await?;
    info!(club = %club.id, name = %club.name, "club created");
    Ok((club.id, true))
}

fn tolerate_conflict<T>(result: domains::Result<T>) -> anyhow::Result<()> {
    match result {
        Ok(_) | Err(AppError::Conflict(_)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
