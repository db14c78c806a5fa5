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

//! The question categories a caller may request.

use crate::configs::MOCKEXAM_FULL_TEST_SECTIONS;
use crate::error::MockExamError;
use std::fmt;
use std::str::FromStr;

/// A recognized question type.
///
/// Parsing is an exact, case-sensitive match against the wire names; no
/// normalization happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `writing`
    Writing,
    /// `reading`
    Reading,
    /// `listening`
    Listening,
    /// `speaking`
    Speaking,
    /// `fullTest`, one question of every section merged together.
    FullTest,
}

impl Category {
    /// Every recognized category.
    pub const ALL: [Category; 5] = [
        Category::Writing,
        Category::Reading,
        Category::Listening,
        Category::Speaking,
        Category::FullTest,
    ];

    /// The wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Writing => "writing",
            Category::Reading => "reading",
            Category::Listening => "listening",
            Category::Speaking => "speaking",
            Category::FullTest => "fullTest",
        }
    }

    /// The partitions a question is drawn from, in merge order.
    pub fn sections(&self) -> Vec<String> {
        match self {
            Category::FullTest => MOCKEXAM_FULL_TEST_SECTIONS.clone(),
            single => vec![single.as_str().to_owned()],
        }
    }
}

impl FromStr for Category {
    type Err = MockExamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| MockExamError::InvalidCategory(s.to_owned()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_names() {
        for name in ["writing", "reading", "listening", "speaking", "fullTest"] {
            let category: Category = name.parse().unwrap();
            assert_eq!(name, category.to_string());
        }
    }

    #[test]
    fn exact_match_only() {
        for name in [
            "essay", "", "Writing", "READING", " listening", "speaking/", "FullTest", "fulltest",
        ] {
            match name.parse::<Category>() {
                Err(MockExamError::InvalidCategory(desc)) => assert_eq!(name, desc),
                other => panic!("{:?} should be rejected, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn sections_in_merge_order() {
        assert_eq!(vec!["reading".to_owned()], Category::Reading.sections());
        assert_eq!(
            vec!["Writing", "Reading", "Listening", "Speaking"],
            Category::FullTest.sections()
        );
    }
}
