use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::model::Member;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Question<'a> {
    pub member: &'a Member,
    pub answered: bool,
}

impl<'a> Question<'a> {
    pub fn prompt(&self) -> String {
        format!("Q: {}のサイリウムカラーは?", self.member.name)
    }

    pub fn answer(&self) -> String {
        format!("A: {}", self.member.penlight_label())
    }
}

/// Penlight color trivia over the active members.
pub struct Quiz<'a> {
    pool: Vec<&'a Member>,
    current: Option<Question<'a>>,
    rng: StdRng,
}

impl<'a> Quiz<'a> {
    pub fn new(members: &'a [Member], seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut quiz = Self {
            pool: members.iter().filter(|m| m.is_active()).collect(),
            current: None,
            rng,
        };
        quiz.next();
        quiz
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    pub fn current(&self) -> Option<&Question<'a>> {
        self.current.as_ref()
    }

    pub fn reveal(&mut self) -> Option<String> {
        let q = self.current.as_mut()?;
        q.answered = true;
        Some(q.answer())
    }

    /// Draws a new question. Repeats are allowed, as with a plain random draw.
    pub fn next(&mut self) -> Option<&Question<'a>> {
        let member = *self.pool.choose(&mut self.rng)?;
        self.current = Some(Question {
            member,
            answered: false,
        });
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, active: Option<bool>) -> Member {
        Member {
            id: id.to_string(),
            name: id.to_string(),
            color1_name: "紫".to_string(),
            color2_name: Some("白".to_string()),
            active,
            ..Member::default()
        }
    }

    #[test]
    fn only_active_members_are_asked() {
        let members = vec![member("a", Some(true)), member("b", None), member("c", Some(false))];
        let mut quiz = Quiz::new(&members, Some(7));
        assert_eq!(quiz.pool_size(), 1);
        for _ in 0..10 {
            assert_eq!(quiz.next().unwrap().member.id, "a");
        }
    }

    #[test]
    fn reveal_then_next_resets_answered() {
        let members = vec![member("a", Some(true)), member("b", Some(true))];
        let mut quiz = Quiz::new(&members, Some(1));
        assert!(!quiz.current().unwrap().answered);
        assert_eq!(quiz.reveal().as_deref(), Some("A: 紫 x 白"));
        assert!(quiz.current().unwrap().answered);
        assert!(!quiz.next().unwrap().answered);
    }

    #[test]
    fn same_seed_same_sequence() {
        let members: Vec<Member> = (0..20).map(|i| member(&i.to_string(), Some(true))).collect();
        let mut a = Quiz::new(&members, Some(42));
        let mut b = Quiz::new(&members, Some(42));
        for _ in 0..5 {
            assert_eq!(a.next().unwrap().member.id, b.next().unwrap().member.id);
        }
    }

    #[test]
    fn empty_pool_has_no_question() {
        let members = vec![member("a", None)];
        let mut quiz = Quiz::new(&members, None);
        assert!(quiz.is_empty());
        assert!(quiz.current().is_none());
        assert!(quiz.reveal().is_none());
    }
}
