// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Draws questions out of the question bank.
//!
//! Every category partition holds an index record, keyed by the configured
//! index sort key, that lists the sort keys of all questions of the category.
//! A draw reads the index, picks one sort key uniformly at random and reads
//! that question. Draws are independent: the same question may be served to
//! the same caller again.

use crate::category::Category;
use crate::error::{MockExamError, Result};
use crate::store::{Record, RecordKey, RecordStore};
use futures::future::try_join_all;
use log::debug;
use rand::seq::SliceRandom;

/// A question drawn from one section.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// The partition the question was drawn from.
    pub section: String,
    /// The sort key of the question.
    pub id:      String,
    /// The question attributes without the table key attributes.
    pub content: Record,
}

/// Fetches random questions through a [`RecordStore`].
pub struct QuestionFetcher<'a, S: RecordStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> QuestionFetcher<'a, S> {
    /// Creates a fetcher reading from `store`.
    pub fn new(store: &'a S) -> Self {
        QuestionFetcher { store }
    }

    /// Draws one question per section of `category` and merges their
    /// content.
    pub async fn fetch(&self, category: Category) -> Result<Record> {
        Ok(merge(self.fetch_questions(category).await?))
    }

    /// Draws one question per section of `category`, in merge order.
    ///
    /// The sections are read concurrently. The draw succeeds only if every
    /// section succeeds; no partial result is returned.
    pub async fn fetch_questions(&self, category: Category) -> Result<Vec<Question>> {
        let sections = category.sections();
        if sections.is_empty() {
            return Err(MockExamError::Config(format!(
                "no sections configured for {}",
                category
            )));
        }
        try_join_all(sections.iter().map(|s| self.fetch_section(s))).await
    }

    /// Draws a random question from a single partition.
    pub async fn fetch_section(&self, section: &str) -> Result<Question> {
        let table = self.store.table();

        let index = self
            .store
            .get(&RecordKey::new(section, &table.index_sort_key))
            .await?
            .ok_or_else(|| MockExamError::IndexNotFound(section.to_owned()))?;
        let ids = index_ids(section, &index, &table.index_attribute)?;
        let id = choose(section, &ids)?;

        let mut content = self
            .store
            .get(&RecordKey::new(section, &id))
            .await?
            .ok_or_else(|| MockExamError::QuestionRecordMissing {
                category: section.to_owned(),
                id:       id.clone(),
            })?;
        content.remove(&table.partition_key);
        content.remove(&table.sort_key);

        debug!(
            "Drew question {} out of {} from {}",
            id,
            ids.len(),
            section
        );
        Ok(Question {
            section: section.to_owned(),
            id,
            content,
        })
    }
}

/// Merges the content of the questions into one record. On attribute-name
/// collisions the later question wins.
pub fn merge(questions: impl IntoIterator<Item = Question>) -> Record {
    questions
        .into_iter()
        .fold(Record::new(), |mut merged, question| {
            merged.extend(question.content);
            merged
        })
}

/// Extracts the question sort keys listed by an index record. The index is
/// either a list of strings or a string set.
fn index_ids(section: &str, index: &Record, attribute: &str) -> Result<Vec<String>> {
    let value = match index.get(attribute) {
        None => return Err(MockExamError::IndexNotFound(section.to_owned())),
        Some(value) if value.null == Some(true) => {
            return Err(MockExamError::IndexNotFound(section.to_owned()))
        }
        Some(value) => value,
    };
    if let Some(ids) = &value.ss {
        return Ok(ids.clone());
    }
    match &value.l {
        Some(ids) => ids
            .iter()
            .map(|id| {
                id.s.clone().ok_or_else(|| {
                    MockExamError::MalformedIndex(format!(
                        "{}: sort key {:?} is not a string",
                        section, id
                    ))
                })
            })
            .collect(),
        None => Err(MockExamError::MalformedIndex(format!(
            "{}: expected a list of sort keys, found {:?}",
            section, value
        ))),
    }
}

/// Picks one sort key uniformly at random.
fn choose(section: &str, ids: &[String]) -> Result<String> {
    ids.choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| MockExamError::NoQuestionsAvailable(section.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::string_attribute;
    use crate::test_util::{record_json, MemoryStore};
    use rusoto_dynamodb::AttributeValue;
    use serde_json::json;
    use std::collections::HashMap;

    fn reading_bank() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_index("reading", &["q1", "q2"]);
        store.insert_question("reading", "q1", json!({"text": "A"}));
        store.insert_question("reading", "q2", json!({"text": "B"}));
        store
    }

    #[tokio::test]
    async fn draw_from_index() -> Result<()> {
        let store = reading_bank();
        let question = QuestionFetcher::new(&store).fetch_section("reading").await?;

        assert_eq!("reading", question.section);
        let expected = match question.id.as_str() {
            "q1" => json!({"text": "A"}),
            "q2" => json!({"text": "B"}),
            other => panic!("unexpected question {}", other),
        };
        assert_eq!(expected, record_json(question.content));
        assert_eq!(2, store.gets());
        assert_eq!(0, store.puts());
        Ok(())
    }

    #[tokio::test]
    async fn missing_index() {
        let store = MemoryStore::new();
        match QuestionFetcher::new(&store).fetch(Category::Speaking).await {
            Err(MockExamError::IndexNotFound(section)) => assert_eq!("speaking", section),
            other => panic!("expected IndexNotFound, got {:?}", other),
        }
        assert_eq!(1, store.gets());

        // An index record without the index attribute is no index at all.
        store.insert(json!({"PK": "speaking", "SK": "index"}));
        assert!(matches!(
            QuestionFetcher::new(&store).fetch(Category::Speaking).await,
            Err(MockExamError::IndexNotFound(_))
        ));
    }

    #[tokio::test]
    async fn draw_from_string_set_index() -> Result<()> {
        let store = MemoryStore::new();
        let mut index = RecordKey::new("speaking", "index").to_record(store.table());
        index.insert("index".to_owned(), AttributeValue {
            ss: Some(vec!["s1".to_owned()]),
            ..Default::default()
        });
        store.insert_record(index);
        store.insert_question("speaking", "s1", json!({"prompt": "Describe your town"}));

        let question = QuestionFetcher::new(&store).fetch_section("speaking").await?;
        assert_eq!("s1", question.id);
        assert_eq!(json!({"prompt": "Describe your town"}), record_json(question.content));
        Ok(())
    }

    #[tokio::test]
    async fn null_index() {
        let store = MemoryStore::new();
        store.insert(json!({"PK": "reading", "SK": "index", "index": null}));
        assert!(matches!(
            QuestionFetcher::new(&store).fetch(Category::Reading).await,
            Err(MockExamError::IndexNotFound(_))
        ));
    }

    #[tokio::test]
    async fn content_keeps_attribute_types() -> Result<()> {
        let mut content = Record::new();
        content.insert("score".to_owned(), AttributeValue {
            n: Some("12345678901234567890123".to_owned()),
            ..Default::default()
        });
        content.insert("tags".to_owned(), AttributeValue {
            ss: Some(vec!["a".to_owned()]),
            ..Default::default()
        });
        content.insert("image".to_owned(), AttributeValue {
            b: Some(b"hi".to_vec().into()),
            ..Default::default()
        });
        let mut nested = Record::new();
        nested.insert("text".to_owned(), string_attribute("A"));
        content.insert("part".to_owned(), AttributeValue {
            m: Some(nested),
            ..Default::default()
        });

        let store = MemoryStore::new();
        store.insert_index("reading", &["q1"]);
        store.insert_question_record("reading", "q1", content.clone());

        let question = QuestionFetcher::new(&store).fetch_section("reading").await?;
        assert_eq!(content, question.content);
        Ok(())
    }

    #[tokio::test]
    async fn empty_index() {
        let store = MemoryStore::new();
        store.insert_index("writing", &[]);
        match QuestionFetcher::new(&store).fetch(Category::Writing).await {
            Err(MockExamError::NoQuestionsAvailable(section)) => assert_eq!("writing", section),
            other => panic!("expected NoQuestionsAvailable, got {:?}", other),
        }
        assert_eq!(1, store.gets());
    }

    #[tokio::test]
    async fn malformed_index() {
        let store = MemoryStore::new();
        store.insert(json!({"PK": "writing", "SK": "index", "index": "q1"}));
        store.insert(json!({"PK": "reading", "SK": "index", "index": [1, 2]}));

        let fetcher = QuestionFetcher::new(&store);
        assert!(matches!(
            fetcher.fetch(Category::Writing).await,
            Err(MockExamError::MalformedIndex(_))
        ));
        assert!(matches!(
            fetcher.fetch(Category::Reading).await,
            Err(MockExamError::MalformedIndex(_))
        ));
    }

    #[tokio::test]
    async fn dangling_index_entry() {
        let store = MemoryStore::new();
        store.insert_index("listening", &["q9"]);
        match QuestionFetcher::new(&store).fetch(Category::Listening).await {
            Err(MockExamError::QuestionRecordMissing { category, id }) => {
                assert_eq!("listening", category);
                assert_eq!("q9", id);
            }
            other => panic!("expected QuestionRecordMissing, got {:?}", other),
        }
        assert_eq!(2, store.gets());
    }

    #[tokio::test]
    async fn storage_failure() {
        let store = reading_bank();
        store.fail_reads(true);
        assert!(matches!(
            QuestionFetcher::new(&store).fetch(Category::Reading).await,
            Err(MockExamError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn uniform_draws() -> Result<()> {
        let store = MemoryStore::new();
        let ids = ["q1", "q2", "q3", "q4"];
        store.insert_index("listening", &ids);
        for id in ids {
            store.insert_question("listening", id, json!({ "audio": format!("{}.mp3", id) }));
        }

        let draws = 4000;
        let fetcher = QuestionFetcher::new(&store);
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..draws {
            let question = fetcher.fetch_section("listening").await?;
            *counts.entry(question.id).or_default() += 1;
        }

        assert_eq!(ids.len(), counts.len());
        for (id, count) in counts {
            // Expected 1000 per question, the standard deviation is about 27.
            assert!(
                (800..=1200).contains(&count),
                "question {} drawn {} times out of {}",
                id,
                count,
                draws
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn reads_leave_the_bank_untouched() -> Result<()> {
        let store = reading_bank();
        let before = store.snapshot();
        let fetcher = QuestionFetcher::new(&store);
        for _ in 0..20 {
            fetcher.fetch(Category::Reading).await?;
        }
        assert_eq!(before, store.snapshot());
        assert_eq!(0, store.puts());
        Ok(())
    }

    #[tokio::test]
    async fn full_test_merge_order() -> Result<()> {
        let store = MemoryStore::new();
        for section in ["Writing", "Reading", "Listening", "Speaking"] {
            let mut content = json!({ "text": format!("{} text", section) });
            content[section.to_lowercase()] = json!(true);
            store.insert_index(section, &["only"]);
            store.insert_question(section, "only", content);
        }

        let fetcher = QuestionFetcher::new(&store);
        let questions = fetcher.fetch_questions(Category::FullTest).await?;
        assert_eq!(
            vec!["Writing", "Reading", "Listening", "Speaking"],
            questions.iter().map(|q| q.section.as_str()).collect::<Vec<_>>()
        );
        assert_eq!(8, store.gets());

        assert_eq!(
            json!({
                "text": "Speaking text",
                "writing": true,
                "reading": true,
                "listening": true,
                "speaking": true,
            }),
            record_json(merge(questions))
        );
        Ok(())
    }

    #[tokio::test]
    async fn full_test_is_all_or_nothing() {
        let store = MemoryStore::new();
        for section in ["Writing", "Reading", "Speaking"] {
            store.insert_index(section, &["only"]);
            store.insert_question(section, "only", json!({ "text": section }));
        }

        match QuestionFetcher::new(&store).fetch(Category::FullTest).await {
            Err(MockExamError::IndexNotFound(section)) => assert_eq!("Listening", section),
            other => panic!("expected IndexNotFound, got {:?}", other),
        }
    }
}
