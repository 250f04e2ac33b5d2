//! Groups report messages by resolved author.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::model::message::MessageRecord;
use crate::report::classifier::{Classifier, Verdict};
use crate::report::contacts::Directory;

/// All report messages of one author, in encounter order.
#[derive(Debug, Clone)]
pub struct AuthorGroup<'m> {
    /// Contact name, or the raw sender address when unknown.
    pub author: String,
    pub messages: Vec<&'m MessageRecord>,
}

/// How many messages each verdict claimed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct VerdictCounts {
    pub reports: usize,
    pub automated: usize,
    pub replies: usize,
    pub missing_sender: usize,
}

/// Author groups in first-seen order. No group is ever empty.
#[derive(Debug, Clone, Default)]
pub struct AuthorGroups<'m> {
    index: HashMap<String, usize>,
    groups: Vec<AuthorGroup<'m>>,
    counts: VerdictCounts,
}

impl<'m> AuthorGroups<'m> {
    fn push(&mut self, author: &str, message: &'m MessageRecord) {
        match self.index.get(author) {
            Some(&i) => self.groups[i].messages.push(message),
            None => {
                self.index.insert(author.to_string(), self.groups.len());
                self.groups.push(AuthorGroup {
                    author: author.to_string(),
                    messages: vec![message],
                });
            }
        }
    }

    /// Messages grouped under `author`, if any.
    pub fn get(&self, author: &str) -> Option<&[&'m MessageRecord]> {
        self.index
            .get(author)
            .map(|&i| self.groups[i].messages.as_slice())
    }

    /// Groups in the order their authors were first encountered.
    pub fn iter(&self) -> impl Iterator<Item = &AuthorGroup<'m>> {
        self.groups.iter()
    }

    /// Number of distinct authors.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Classification tally for the input that produced these groups.
    pub fn verdicts(&self) -> VerdictCounts {
        self.counts
    }
}

impl<'m> IntoIterator for AuthorGroups<'m> {
    type Item = AuthorGroup<'m>;
    type IntoIter = std::vec::IntoIter<AuthorGroup<'m>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Filter `messages` through the classifier and group the reports by
/// author key (see [`Directory::resolve`]).
pub fn group_by_author<'m>(
    messages: &'m [MessageRecord],
    classifier: &Classifier,
    directory: &Directory,
) -> AuthorGroups<'m> {
    let mut groups = AuthorGroups::default();

    for message in messages {
        match classifier.classify(message) {
            Verdict::Report => {
                groups.counts.reports += 1;
            }
            Verdict::Automated => {
                groups.counts.automated += 1;
                debug!(sequence = message.sequence, sender = ?message.sender_address(), "Ignoring automated sender");
                continue;
            }
            Verdict::Reply => {
                groups.counts.replies += 1;
                debug!(sequence = message.sequence, subject = %message.subject, "Ignoring reply");
                continue;
            }
            Verdict::MissingSender => {
                groups.counts.missing_sender += 1;
                warn!(sequence = message.sequence, "Cannot classify message without sender");
                continue;
            }
        }

        // Report verdict guarantees a sender
        let Some(address) = message.sender_address() else {
            continue;
        };
        groups.push(directory.resolve(address), message);
    }

    groups
}
