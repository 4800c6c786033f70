//! Catalog recommendations driven by mood and a user's saved favorites.
//!
//! Favorites live in an external store reached through [`FavoritesStore`].
//! Every recommendation list is deterministic: candidates keep corpus order.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::corpus::Corpus;
use crate::error::Result;
use crate::record::Record;

/// Moods treated as interchangeable when a requested mood has no exact match.
pub const SIMILAR_MOODS: &[(&str, &[&str])] = &[
    ("happy", &["energetic", "upbeat", "joyful"]),
    ("sad", &["melancholic", "emotional", "depressed"]),
    ("energetic", &["happy", "upbeat", "exciting"]),
    ("chill", &["peaceful", "calm", "relaxed"]),
    ("romantic", &["emotional", "love", "intimate"]),
    ("angry", &["aggressive", "intense", "fierce"]),
    ("peaceful", &["chill", "calm", "serene"]),
];

fn similar_moods(mood: &str) -> &'static [&'static str] {
    SIMILAR_MOODS.iter().find(|(m, _)| *m == mood).map(|(_, similar)| *similar).unwrap_or(&[])
}

/// Per-user favorites persistence.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// The user's favorites, oldest first. Unknown users have none.
    async fn favorites(&self, user_id: &str) -> Result<Vec<Record>>;
}

/// A [`FavoritesStore`] kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryFavoritesStore {
    users: RwLock<HashMap<String, Vec<Record>>>,
}

impl InMemoryFavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save `record` for `user_id`. Returns `false` if the same work is already saved.
    pub async fn add(&self, user_id: &str, record: Record) -> bool {
        let mut users = self.users.write().await;
        let favorites = users.entry(user_id.to_string()).or_default();
        if favorites.iter().any(|f| f.same_work(&record)) {
            return false;
        }
        favorites.push(record);
        true
    }

    /// Remove the work identified by `title` and `author`. Returns whether anything was removed.
    pub async fn remove(&self, user_id: &str, title: &str, author: &str) -> bool {
        let mut users = self.users.write().await;
        let Some(favorites) = users.get_mut(user_id) else {
            return false;
        };
        let before = favorites.len();
        favorites.retain(|f| {
            !(f.title.eq_ignore_ascii_case(title) && f.author.eq_ignore_ascii_case(author))
        });
        favorites.len() != before
    }

    pub async fn clear(&self, user_id: &str) {
        self.users.write().await.remove(user_id);
    }
}

#[async_trait]
impl FavoritesStore for InMemoryFavoritesStore {
    async fn favorites(&self, user_id: &str) -> Result<Vec<Record>> {
        Ok(self.users.read().await.get(user_id).cloned().unwrap_or_default())
    }
}

/// Produces recommendation lists from a corpus snapshot.
pub struct Recommender {
    corpus: Arc<Corpus>,
    favorites: Arc<dyn FavoritesStore>,
}

fn is_excluded(record: &Record, exclude: &[Record]) -> bool {
    exclude.iter().any(|e| e.same_work(record))
}

fn push_unique(out: &mut Vec<Record>, record: &Record) {
    if !out.iter().any(|r| r.same_work(record)) {
        out.push(record.clone());
    }
}

/// The most frequent value, ties resolved by first appearance.
fn most_common<'a>(values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    let best = counts.iter().map(|(_, c)| *c).max()?;
    counts.into_iter().find(|(_, c)| *c == best).map(|(v, _)| v)
}

impl Recommender {
    pub fn new(corpus: Arc<Corpus>, favorites: Arc<dyn FavoritesStore>) -> Self {
        Self { corpus, favorites }
    }

    /// Records whose mood contains `mood` (case-insensitive). When none do,
    /// records whose mood is one of the [`SIMILAR_MOODS`] for `mood`.
    pub fn by_mood(&self, mood: &str, limit: usize, exclude: &[Record]) -> Vec<Record> {
        let wanted = mood.trim().to_lowercase();
        let mut matches: Vec<&Record> =
            self.corpus.iter().filter(|r| r.mood.to_lowercase().contains(&wanted)).collect();
        if matches.is_empty() {
            let similar = similar_moods(&wanted);
            matches = self
                .corpus
                .iter()
                .filter(|r| similar.iter().any(|m| r.mood.eq_ignore_ascii_case(m)))
                .collect();
            debug!(mood = %wanted, similar = ?similar, match_count = matches.len(), "used similar moods");
        }
        matches.into_iter().filter(|r| !is_excluded(r, exclude)).take(limit).cloned().collect()
    }

    /// Recommendations from the user's favorites: records sharing the most
    /// common genre, mood or author among them, excluding the favorites
    /// themselves. Users without favorites get the head of the catalog.
    pub async fn for_user(&self, user_id: &str, limit: usize) -> Result<Vec<Record>> {
        let favorites = self.favorites.favorites(user_id).await?;
        if favorites.is_empty() {
            return Ok(self.popular(limit, &[]));
        }

        let top_genre = most_common(favorites.iter().map(|f| f.genre.as_str()));
        let top_mood = most_common(favorites.iter().map(|f| f.mood.as_str()));
        let top_author = most_common(favorites.iter().map(|f| f.author.as_str()));

        let mut out = Vec::new();
        for record in self.corpus.iter().filter(|r| !is_excluded(r, &favorites)) {
            if Some(record.genre.as_str()) == top_genre
                || Some(record.mood.as_str()) == top_mood
                || Some(record.author.as_str()) == top_author
            {
                push_unique(&mut out, record);
            }
        }
        out.truncate(limit);
        info!(user_id, favorite_count = favorites.len(), result_count = out.len(), "user recommendations");
        Ok(out)
    }

    /// Half mood-based (when `mood` is given) and half preference-based,
    /// topped up from the head of the catalog. Deduplicated by work.
    pub async fn hybrid(
        &self,
        user_id: &str,
        mood: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Record>> {
        let favorites = self.favorites.favorites(user_id).await?;
        let mut out = Vec::new();

        if let Some(mood) = mood {
            for record in self.by_mood(mood, limit / 2, &favorites) {
                push_unique(&mut out, &record);
            }
        }
        if !favorites.is_empty() {
            for record in self.for_user(user_id, limit / 2).await? {
                push_unique(&mut out, &record);
            }
        }
        if out.len() < limit {
            for record in self.popular(limit, &favorites) {
                if out.len() >= limit {
                    break;
                }
                push_unique(&mut out, &record);
            }
        }
        out.truncate(limit);
        Ok(out)
    }

    /// Records sharing the genre or mood of the record titled `title`,
    /// excluding that record. Empty when the title is unknown.
    pub fn similar_to(&self, title: &str, limit: usize) -> Vec<Record> {
        let Some(reference) = self.corpus.iter().find(|r| r.title.eq_ignore_ascii_case(title))
        else {
            return Vec::new();
        };
        self.corpus
            .iter()
            .filter(|r| r.id != reference.id)
            .filter(|r| r.genre == reference.genre || r.mood == reference.mood)
            .take(limit)
            .cloned()
            .collect()
    }

    fn popular(&self, limit: usize, exclude: &[Record]) -> Vec<Record> {
        self.corpus.iter().filter(|r| !is_excluded(r, exclude)).take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_common_prefers_first_seen_on_ties() {
        assert_eq!(most_common(["Rock", "Pop", "Pop", "Rock"].into_iter()), Some("Rock"));
        assert_eq!(most_common(["Jazz", "Pop", "Pop"].into_iter()), Some("Pop"));
        assert_eq!(most_common(std::iter::empty()), None);
    }

    #[test]
    fn similar_mood_table_lookup() {
        assert_eq!(similar_moods("chill"), &["peaceful", "calm", "relaxed"]);
        assert!(similar_moods("bored").is_empty());
    }

    #[tokio::test]
    async fn in_memory_store_deduplicates_and_removes() {
        let store = InMemoryFavoritesStore::new();
        let song = Record::new("Imagine", "John Lennon", "Rock", "Peaceful", 1971);
        assert!(store.add("u1", song.clone()).await);
        assert!(!store.add("u1", song).await);
        assert_eq!(store.favorites("u1").await.unwrap().len(), 1);
        assert!(store.remove("u1", "imagine", "john lennon").await);
        assert!(!store.remove("u1", "imagine", "john lennon").await);
        assert!(store.favorites("nobody").await.unwrap().is_empty());
    }
}
