//! Integration tests for `SqliteStore` against an in-memory database.

use agentry_core::{
  Error as CoreError,
  agent::{AgentDraft, AgentKind, AgentStatus, NewAgent},
  agents,
  collection::AgentTotals,
  dashboard::AdminDashboard,
  gate::{Capability, Navigation},
  identity::{AuthError, IdentityProvider, Registration, Session, SessionToken},
  profile,
  store::{AgentScope, PlatformStore},
  user::{ProfileUpdate, UserUpdate},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn register(s: &SqliteStore, email: &str) -> Session {
  s.register(Registration {
    email:     email.into(),
    password:  "correct horse".into(),
    full_name: None,
  })
  .await
  .unwrap()
}

fn draft(name: &str) -> AgentDraft {
  AgentDraft::new(name, "watches the queue", AgentKind::Moderator)
}

// ─── Identity ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_provisions_exactly_one_user() {
  let s = store().await;
  let session = s
    .register(Registration {
      email:     "  Ada@Example.com ".into(),
      password:  "correct horse".into(),
      full_name: Some("Ada Lovelace".into()),
    })
    .await
    .unwrap();

  let user = s.get_user(session.user_id).await.unwrap().unwrap();
  assert_eq!(user.email, "ada@example.com");
  assert_eq!(user.full_name.as_deref(), Some("Ada Lovelace"));
  assert!(!user.is_admin);
  assert_eq!(s.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn register_rejects_bad_input() {
  let s = store().await;
  register(&s, "ada@example.com").await;

  let taken = s
    .register(Registration {
      email:     "ADA@example.com".into(),
      password:  "another one".into(),
      full_name: None,
    })
    .await;
  assert!(matches!(taken, Err(AuthError::EmailTaken(_))));

  let short = s
    .register(Registration {
      email:     "bob@example.com".into(),
      password:  "abc".into(),
      full_name: None,
    })
    .await;
  assert!(matches!(short, Err(AuthError::WeakPassword { min: 6 })));

  let no_at = s
    .register(Registration {
      email:     "bob.example.com".into(),
      password:  "long enough".into(),
      full_name: None,
    })
    .await;
  assert!(matches!(no_at, Err(AuthError::InvalidEmail(_))));

  assert_eq!(s.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn login_and_session_lifecycle() {
  let s = store().await;
  let registered = register(&s, "ada@example.com").await;

  let session = s
    .login("ada@example.com".into(), "correct horse".into())
    .await
    .unwrap();
  assert_eq!(session.user_id, registered.user_id);
  assert_ne!(session.token, registered.token);

  let current = s.current_session(session.token.clone()).await.unwrap().unwrap();
  assert_eq!(current.user_id, registered.user_id);
  assert_eq!(current.email, "ada@example.com");

  s.logout(session.token.clone()).await.unwrap();
  assert!(s.current_session(session.token.clone()).await.unwrap().is_none());
  // The registration session is unaffected.
  assert!(s.current_session(registered.token).await.unwrap().is_some());
  // Revoking twice is fine.
  s.logout(session.token).await.unwrap();
}

#[tokio::test]
async fn login_failures_look_alike() {
  let s = store().await;
  register(&s, "ada@example.com").await;

  let wrong = s.login("ada@example.com".into(), "nope nope".into()).await;
  let unknown = s.login("eve@example.com".into(), "correct horse".into()).await;
  assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
  assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn unknown_token_has_no_session() {
  let s = store().await;
  let none = s.current_session(SessionToken::new("garbage")).await.unwrap();
  assert!(none.is_none());
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_user_is_partial() {
  let s = store().await;
  let session = register(&s, "ada@example.com").await;
  let before = s.get_user(session.user_id).await.unwrap().unwrap();

  let updated = s
    .update_user(session.user_id, UserUpdate {
      avatar_url: Some(Some("https://img.example.com/ada.png".into())),
      ..UserUpdate::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.avatar_url.as_deref(), Some("https://img.example.com/ada.png"));
  assert_eq!(updated.full_name, before.full_name);
  assert_eq!(updated.created_at, before.created_at);
  assert!(updated.updated_at >= before.updated_at);

  let promoted = s
    .update_user(session.user_id, UserUpdate::admin(true))
    .await
    .unwrap()
    .unwrap();
  assert!(promoted.is_admin);
  assert_eq!(promoted.avatar_url, updated.avatar_url);
}

#[tokio::test]
async fn update_missing_user_does_not_insert() {
  let s = store().await;
  let id = Uuid::new_v4();
  assert!(s.update_user(id, UserUpdate::admin(true)).await.unwrap().is_none());
  assert!(s.get_user(id).await.unwrap().is_none());
}

#[tokio::test]
async fn find_user_by_email_normalises() {
  let s = store().await;
  let session = register(&s, "ada@example.com").await;
  let found = s.find_user_by_email(" ADA@example.com".into()).await.unwrap().unwrap();
  assert_eq!(found.id, session.user_id);
}

#[tokio::test]
async fn unprovisioned_profile_is_not_found_but_authenticated() {
  let s = store().await;
  let session = register(&s, "ghost@example.com").await;
  let id = crate::encode::encode_uuid(session.user_id);
  s.conn
    .call(move |conn| {
      conn.execute("DELETE FROM users WHERE id = ?1", rusqlite::params![id])?;
      Ok(())
    })
    .await
    .unwrap();

  let err = profile::fetch_profile(&s, session.user_id).await.unwrap_err();
  assert!(matches!(err, CoreError::UserNotFound(_)));

  let nav = Navigation::resolve(&s, &s, Some(session.token)).await.unwrap();
  assert_eq!(nav.capability(), Capability::Authenticated);
  assert!(nav.profile().is_none());
}

#[tokio::test]
async fn profile_update_clears_with_null() {
  let s = store().await;
  let session = s
    .register(Registration {
      email:     "ada@example.com".into(),
      password:  "correct horse".into(),
      full_name: Some("Ada".into()),
    })
    .await
    .unwrap();

  let update: ProfileUpdate = serde_json::from_str(r#"{"full_name": null}"#).unwrap();
  let user = profile::update_profile(&s, session.user_id, update).await.unwrap();
  assert_eq!(user.full_name, None);
  assert_eq!(user.email, "ada@example.com");
}

// ─── Agents ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_list_round_trip() {
  let s = store().await;
  let owner = register(&s, "ada@example.com").await;

  let agent = agents::create(&s, owner.user_id, draft("Sentinel")).await.unwrap();
  let listed = agents::list(&s, AgentScope::Owner(owner.user_id)).await.unwrap();

  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0], agent);
  assert_eq!(listed[0].status, AgentStatus::Inactive);
  assert!(listed[0].configuration.is_empty());
  assert_eq!(listed[0].kind, AgentKind::Moderator);
}

#[tokio::test]
async fn listings_are_newest_first_and_scoped() {
  let s = store().await;
  let ada = register(&s, "ada@example.com").await;
  let bob = register(&s, "bob@example.com").await;

  let first = agents::create(&s, ada.user_id, draft("first")).await.unwrap();
  let theirs = agents::create(&s, bob.user_id, draft("theirs")).await.unwrap();
  let second = agents::create(&s, ada.user_id, draft("second")).await.unwrap();

  let adas: Vec<_> = agents::list(&s, AgentScope::Owner(ada.user_id))
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.id)
    .collect();
  assert_eq!(adas, vec![second.id, first.id]);

  let all: Vec<_> = agents::list(&s, AgentScope::All)
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.id)
    .collect();
  assert_eq!(all, vec![second.id, theirs.id, first.id]);

  let users = s.list_users().await.unwrap();
  assert_eq!(users[0].id, bob.user_id);
}

#[tokio::test]
async fn insert_for_unknown_owner_fails() {
  let s = store().await;
  let input = NewAgent::from_draft(Uuid::new_v4(), draft("orphan"));
  assert!(s.insert_agent(input).await.is_err());
}

#[tokio::test]
async fn set_status_twice_leaves_row_untouched() {
  let s = store().await;
  let owner = register(&s, "ada@example.com").await;
  let agent = agents::create(&s, owner.user_id, draft("Sentinel")).await.unwrap();

  let first = agents::set_status(&s, agent.id, AgentStatus::Active).await.unwrap();
  let second = agents::set_status(&s, agent.id, AgentStatus::Active).await.unwrap();
  assert_eq!(first, second);
  assert_eq!(first.status, AgentStatus::Active);

  let off = agents::set_status(&s, agent.id, AgentStatus::Inactive).await.unwrap();
  assert_eq!(off.status, AgentStatus::Inactive);
  assert!(off.updated_at >= first.updated_at);
}

#[tokio::test]
async fn delete_agent_reports_missing() {
  let s = store().await;
  let owner = register(&s, "ada@example.com").await;
  let agent = agents::create(&s, owner.user_id, draft("Sentinel")).await.unwrap();

  agents::delete(&s, agent.id).await.unwrap();
  assert!(s.get_agent(agent.id).await.unwrap().is_none());
  assert!(matches!(
    agents::delete(&s, agent.id).await,
    Err(CoreError::AgentNotFound(_))
  ));
}

#[tokio::test]
async fn configuration_round_trips() {
  let s = store().await;
  let owner = register(&s, "ada@example.com").await;
  let mut input = NewAgent::from_draft(owner.user_id, draft("tuned"));
  input
    .configuration
    .insert("temperature".into(), serde_json::json!(0.2));
  input.kind = AgentKind::Other("translator".into());

  let agent = s.insert_agent(input).await.unwrap();
  let fetched = s.get_agent(agent.id).await.unwrap().unwrap();
  assert_eq!(fetched.configuration["temperature"], serde_json::json!(0.2));
  assert_eq!(fetched.kind, AgentKind::Other("translator".into()));
}

// ─── Dashboard over SQLite ───────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_stats_match_store_after_mutations() {
  let s = store().await;
  let root = register(&s, "root@example.com").await;
  s.update_user(root.user_id, UserUpdate::admin(true)).await.unwrap();
  let ada = register(&s, "ada@example.com").await;

  let a = agents::create(&s, ada.user_id, draft("a")).await.unwrap();
  let b = agents::create(&s, ada.user_id, draft("b")).await.unwrap();
  agents::set_status(&s, b.id, AgentStatus::Active).await.unwrap();

  let nav = Navigation::resolve(&s, &s, Some(root.token)).await.unwrap();
  assert_eq!(nav.capability(), Capability::Administrator);

  let mut dash = AdminDashboard::open(&s, &nav).await.unwrap();
  assert_eq!(dash.stats().admin_users, 1);

  dash.toggle_agent_status(a.id).await.unwrap();
  dash.delete_agent(b.id).await.unwrap();
  dash.toggle_user_admin(ada.user_id).await.unwrap();

  let fresh = agents::list(&s, AgentScope::All).await.unwrap();
  let stats = dash.stats();
  assert_eq!(
    AgentTotals { total: stats.total_agents, active: stats.active_agents },
    AgentTotals::count(&fresh)
  );
  assert_eq!(stats.admin_users, 2);
  assert_eq!(stats.total_users, 2);
}
