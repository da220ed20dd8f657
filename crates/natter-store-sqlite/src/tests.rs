//! Integration tests for `SqliteStore` against an in-memory database.

use natter_core::{
  credential::CredentialScheme,
  model::{MessageId, NewMessage},
  page::PageRequest,
  store::{ChannelRegistry, IdentityStore, MessageLedger},
};
use proptest::prelude::*;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn ids(page: &[natter_core::model::EnrichedMessage]) -> Vec<MessageId> {
  page.iter().map(|m| m.message.id).collect()
}

// ─── Identity ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_assigns_increasing_ids() {
  let s = store().await;
  let a = s.register("alice", "pw").await.unwrap();
  let b = s.register("bob", "pw").await.unwrap();
  assert!(b > a);
}

#[tokio::test]
async fn register_allows_duplicate_usernames() {
  let s = store().await;
  let first  = s.register("alice", "one").await.unwrap();
  let second = s.register("alice", "two").await.unwrap();
  assert_ne!(first, second);
}

#[tokio::test]
async fn authenticate_returns_matching_id() {
  let s = store().await;
  s.register("alice", "secret").await.unwrap();
  let bob = s.register("bob", "hunter2").await.unwrap();
  assert_eq!(s.authenticate("bob", "hunter2").await.unwrap(), bob);
}

#[tokio::test]
async fn authenticate_wrong_credential_is_not_found() {
  let s = store().await;
  s.register("bob", "right").await.unwrap();

  let err = s.authenticate("bob", "wrong").await.unwrap_err();
  assert!(matches!(err, Error::InvalidCredentials));
  assert!(matches!(
    natter_core::Error::from(err),
    natter_core::Error::NotFound(_)
  ));
}

#[tokio::test]
async fn authenticate_unknown_user_is_not_found() {
  let s = store().await;
  let err = s.authenticate("nobody", "whatever").await.unwrap_err();
  assert!(matches!(natter_core::Error::from(err), natter_core::Error::NotFound(_)));
}

#[tokio::test]
async fn authenticate_is_case_and_whitespace_sensitive() {
  let s = store().await;
  s.register("bob", "Secret").await.unwrap();
  assert!(s.authenticate("bob", "secret").await.is_err());
  assert!(s.authenticate("Bob", "Secret").await.is_err());
  assert!(s.authenticate("bob", "Secret ").await.is_err());
}

#[tokio::test]
async fn authenticate_duplicate_match_picks_lowest_id() {
  let s = store().await;
  let first = s.register("twin", "pw").await.unwrap();
  s.register("twin", "pw").await.unwrap();
  assert_eq!(s.authenticate("twin", "pw").await.unwrap(), first);
}

#[tokio::test]
async fn argon2_scheme_hashes_and_verifies() {
  let s = store().await.with_credential_scheme(CredentialScheme::Argon2);
  s.register("carol", "decoy").await.unwrap();
  let carol = s.register("carol", "correct horse").await.unwrap();

  assert_eq!(s.authenticate("carol", "correct horse").await.unwrap(), carol);
  assert!(matches!(
    s.authenticate("carol", "battery staple").await,
    Err(Error::InvalidCredentials)
  ));
}

#[tokio::test]
async fn display_name_resolves_or_is_none() {
  let s = store().await;
  let id = s.register("dave", "pw").await.unwrap();
  assert_eq!(s.display_name(id).await.unwrap().as_deref(), Some("dave"));
  assert_eq!(s.display_name(id + 1000).await.unwrap(), None);
}

// ─── Channels ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_channels_empty() {
  let s = store().await;
  assert!(s.list_channels().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_channels_ascending_by_id() {
  let s = store().await;
  let general = s.create_channel("general").await.unwrap();
  let random  = s.create_channel("random").await.unwrap();
  let dup     = s.create_channel("general").await.unwrap();

  let channels = s.list_channels().await.unwrap();
  let listed: Vec<_> = channels.iter().map(|c| (c.id, c.name.as_str())).collect();
  assert_eq!(listed, vec![(general, "general"), (random, "random"), (dup, "general")]);
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_page_returns_everything_in_insertion_order() {
  let s = store().await;
  let author = s.register("erin", "pw").await.unwrap();

  let mut appended = Vec::new();
  for i in 0..5 {
    appended.push(s.append(NewMessage::new(4, author, format!("msg {i}"))).await.unwrap());
  }

  let page = s.page(PageRequest::new(4).limit(i64::MAX)).await.unwrap();
  assert_eq!(ids(&page), appended);
  let texts: Vec<_> = page.iter().map(|m| m.message.text.as_str()).collect();
  assert_eq!(texts, vec!["msg 0", "msg 1", "msg 2", "msg 3", "msg 4"]);
  assert!(page.iter().all(|m| m.author_name.as_deref() == Some("erin")));
}

#[tokio::test]
async fn cursor_skips_seen_messages() {
  let s = store().await;
  let author = s.register("frank", "pw").await.unwrap();
  let m1 = s.append(NewMessage::new(7, author, "one")).await.unwrap();
  let m2 = s.append(NewMessage::new(7, author, "two")).await.unwrap();
  let m3 = s.append(NewMessage::new(7, author, "three")).await.unwrap();
  assert_eq!((m1, m2, m3), (1, 2, 3));

  let page = s.page(PageRequest::new(7).after(1).limit(10)).await.unwrap();
  assert_eq!(ids(&page), vec![2, 3]);
}

#[tokio::test]
async fn page_respects_limit() {
  let s = store().await;
  for i in 0..10 {
    s.append(NewMessage::new(1, 1, format!("{i}"))).await.unwrap();
  }
  let page = s.page(PageRequest::new(1).limit(3)).await.unwrap();
  assert_eq!(page.len(), 3);
  assert_eq!(ids(&page), vec![1, 2, 3]);
}

#[tokio::test]
async fn zero_limit_returns_empty_page() {
  let s = store().await;
  s.append(NewMessage::new(1, 1, "hi")).await.unwrap();
  assert!(s.page(PageRequest::new(1).limit(0)).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_channel_returns_empty_page() {
  let s = store().await;
  s.append(NewMessage::new(1, 1, "elsewhere")).await.unwrap();
  assert!(s.page(PageRequest::new(2)).await.unwrap().is_empty());
}

#[tokio::test]
async fn channels_are_partitioned() {
  let s = store().await;
  let a1 = s.append(NewMessage::new(1, 1, "a1")).await.unwrap();
  let b1 = s.append(NewMessage::new(2, 1, "b1")).await.unwrap();
  let a2 = s.append(NewMessage::new(1, 1, "a2")).await.unwrap();

  assert_eq!(ids(&s.page(PageRequest::new(1)).await.unwrap()), vec![a1, a2]);
  assert_eq!(ids(&s.page(PageRequest::new(2)).await.unwrap()), vec![b1]);
  assert!(a1 < b1 && b1 < a2);
}

#[tokio::test]
async fn dangling_author_has_no_name() {
  let s = store().await;
  s.append(NewMessage::new(7, 999, "ghost")).await.unwrap();

  let page = s.page(PageRequest::new(7).limit(10)).await.unwrap();
  assert_eq!(page.len(), 1);
  assert_eq!(page[0].message.author_id, 999);
  assert_eq!(page[0].author_name, None);
  assert_eq!(page[0].author_name_or_empty(), "");
}

#[tokio::test]
async fn append_stamps_created_at() {
  let s = store().await;
  let before = chrono::Utc::now() - chrono::Duration::seconds(1);
  s.append(NewMessage::new(1, 1, "now")).await.unwrap();
  let after = chrono::Utc::now() + chrono::Duration::seconds(1);

  let page = s.page(PageRequest::new(1)).await.unwrap();
  let at = page[0].message.created_at;
  assert!(before <= at && at <= after, "{at}");
}

#[tokio::test]
async fn file_backed_store_persists_across_reopen() {
  let dir  = std::env::temp_dir().join(format!("natter-test-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("reopen.db");
  let _ = std::fs::remove_file(&path);

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.append(NewMessage::new(1, 1, "kept")).await.unwrap();
  }
  let s = SqliteStore::open(&path).await.unwrap();
  let next = s.append(NewMessage::new(1, 1, "next")).await.unwrap();
  let page = s.page(PageRequest::new(1)).await.unwrap();
  assert_eq!(ids(&page), vec![1, next]);
  assert_eq!(next, 2);

  let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn database_failure_is_storage_unavailable() {
  let dir  = std::env::temp_dir().join(format!("natter-broken-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("broken.db");
  let _ = std::fs::remove_file(&path);

  let s = SqliteStore::open(&path).await.unwrap();
  s.append(NewMessage::new(1, 1, "before")).await.unwrap();
  rusqlite::Connection::open(&path)
    .unwrap()
    .execute_batch("DROP TABLE messages")
    .unwrap();

  let err = s.append(NewMessage::new(1, 1, "after")).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)), "{err:?}");
  let err = natter_core::Error::from(err);
  assert!(matches!(err, natter_core::Error::StorageUnavailable(_)), "{err:?}");

  let err = s.page(PageRequest::new(1)).await.unwrap_err();
  let err = natter_core::Error::from(err);
  assert!(matches!(err, natter_core::Error::StorageUnavailable(_)), "{err:?}");
  assert!(err.to_string().contains("messages"), "{err}");

  let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn negative_raw_limit_returns_empty_page() {
  let s = store().await;
  s.append(NewMessage::new(1, 1, "a")).await.unwrap();
  let req = PageRequest { channel_id: 1, after_id: 0, limit: -1 };
  assert!(s.page(req).await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_appends_get_distinct_ordered_ids() {
  let s = store().await;

  let mut handles = Vec::new();
  for i in 0..50 {
    let s = s.clone();
    handles.push(tokio::spawn(async move {
      s.append(NewMessage::new(3, 1, format!("{i}"))).await.unwrap()
    }));
  }
  let mut got = Vec::new();
  for h in handles {
    got.push(h.await.unwrap());
  }
  got.sort_unstable();
  got.dedup();
  assert_eq!(got.len(), 50);

  let page = s.page(PageRequest::new(3).limit(100)).await.unwrap();
  assert_eq!(ids(&page), got);
}

// ─── Properties ──────────────────────────────────────────────────────────────

fn block_on<F: std::future::Future>(f: F) -> F::Output {
  tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .expect("runtime")
    .block_on(f)
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(32))]

  /// Walking a channel page by page, feeding back the last seen ID, yields
  /// every message of that channel exactly once and in insertion order.
  #[test]
  fn pagination_is_lossless_and_non_overlapping(
    channels in proptest::collection::vec(1i64..4, 0..40),
    page_size in 1i64..8,
  ) {
    let (expected, walked, max_page) = block_on(async {
      let s = store().await;
      let mut expected: Vec<(i64, MessageId)> = Vec::new();
      for (i, ch) in channels.iter().enumerate() {
        let id = s.append(NewMessage::new(*ch, 1, format!("{i}"))).await.unwrap();
        expected.push((*ch, id));
      }

      let mut walked: Vec<(i64, MessageId)> = Vec::new();
      let mut max_page = 0;
      for ch in 1..4 {
        let mut cursor = 0;
        loop {
          let page = s
            .page(PageRequest::new(ch).after(cursor).limit(page_size))
            .await
            .unwrap();
          max_page = max_page.max(page.len());
          for m in &page {
            walked.push((ch, m.message.id));
          }
          match page.last() {
            Some(last) if page.len() as i64 == page_size => cursor = last.message.id,
            _ => break,
          }
        }
      }
      (expected, walked, max_page)
    });

    prop_assert!(max_page as i64 <= page_size);
    for ch in 1..4 {
      let want: Vec<_> = expected.iter().filter(|(c, _)| *c == ch).map(|(_, id)| *id).collect();
      let got:  Vec<_> = walked.iter().filter(|(c, _)| *c == ch).map(|(_, id)| *id).collect();
      prop_assert_eq!(want, got);
    }
  }

  /// Every returned ID is strictly greater than the cursor.
  #[test]
  fn page_only_returns_ids_after_cursor(count in 0usize..20, cursor in 0i64..25) {
    let page = block_on(async {
      let s = store().await;
      for i in 0..count {
        s.append(NewMessage::new(1, 1, format!("{i}"))).await.unwrap();
      }
      s.page(PageRequest::new(1).after(cursor).limit(100)).await.unwrap()
    });

    let got = ids(&page);
    prop_assert!(got.iter().all(|id| *id > cursor));
    prop_assert!(got.windows(2).all(|w| w[0] < w[1]));
    prop_assert_eq!(got.len(), count.saturating_sub(cursor as usize));
  }
}
