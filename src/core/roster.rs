use crate::core::learner::Learner;
use crate::domain::model::{StudentKey, SubjectSnapshot};
use std::collections::{BTreeSet, HashMap};

/// 學生目錄：StudentKey -> Learner
pub type LearnerDirectory = HashMap<StudentKey, Learner>;

/// 單一課程的座位與選課名單。
///
/// 名單只存學生鍵，實際的 `Learner` 由 `LearnerDirectory` 持有。
#[derive(Debug, Clone)]
pub struct SubjectRoster {
    department: String,
    course_number: u32,
    total_seats: u32,
    enrolled: BTreeSet<StudentKey>,
}

impl SubjectRoster {
    pub fn new(department: &str, course_number: u32, total_seats: u32) -> Self {
        Self {
            department: department.to_string(),
            course_number,
            total_seats,
            enrolled: BTreeSet::new(),
        }
    }

    /// 不檢查座位，呼叫端須先確認 `is_full`
    pub fn register_student(&mut self, key: StudentKey) {
        self.enrolled.insert(key);
    }

    pub fn is_student_enrolled(&self, first_name: &str, last_name: &str) -> bool {
        self.enrolled
            .contains(&StudentKey::from_names(first_name, last_name))
    }

    pub fn is_full(&self) -> bool {
        self.enrolled.len() >= self.total_seats as usize
    }

    pub fn count_enrolled_students(&self) -> usize {
        self.enrolled.len()
    }

    pub fn count_students_by_last_name(&self, last_name: &str, learners: &LearnerDirectory) -> usize {
        self.enrolled
            .iter()
            .filter_map(|key| learners.get(key))
            .filter(|learner| learner.has_family_name(last_name))
            .count()
    }

    pub fn unregister_student(&mut self, key: &StudentKey) -> bool {
        self.enrolled.remove(key)
    }

    /// 每位已選課學生的選課數減一，然後清空名單
    pub fn clear_enrollments(&mut self, learners: &mut LearnerDirectory) {
        for key in &self.enrolled {
            if let Some(learner) = learners.get_mut(key) {
                learner.withdraw();
            }
        }
        self.enrolled.clear();
    }

    pub fn total_seats(&self) -> u32 {
        self.total_seats
    }

    pub fn snapshot(&self) -> SubjectSnapshot {
        SubjectSnapshot {
            department: self.department.clone(),
            course_number: self.course_number,
            total_seats: self.total_seats,
            enrolled: self.enrolled.iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enroll(roster: &mut SubjectRoster, learners: &mut LearnerDirectory, first: &str, last: &str) {
        let key = StudentKey::from_names(first, last);
        let learner = learners
            .entry(key.clone())
            .or_insert_with(|| Learner::new(first, last, 5));
        learner.enroll();
        roster.register_student(key);
    }

    #[test]
    fn test_is_full_at_seat_count() {
        let mut roster = SubjectRoster::new("CS", 101, 2);
        let mut learners = LearnerDirectory::new();

        enroll(&mut roster, &mut learners, "Ada", "Lovelace");
        assert!(!roster.is_full());
        enroll(&mut roster, &mut learners, "Alan", "Turing");
        assert!(roster.is_full());
        assert_eq!(roster.count_enrolled_students(), 2);
    }

    #[test]
    fn test_register_does_not_check_capacity() {
        let mut roster = SubjectRoster::new("CS", 101, 1);
        roster.register_student(StudentKey::from_names("A", "B"));
        roster.register_student(StudentKey::from_names("C", "D"));
        assert_eq!(roster.count_enrolled_students(), 2);
    }

    #[test]
    fn test_count_by_last_name() {
        let mut roster = SubjectRoster::new("HIST", 210, 10);
        let mut learners = LearnerDirectory::new();

        enroll(&mut roster, &mut learners, "John", "Doe");
        enroll(&mut roster, &mut learners, "Jane", "Doe");
        enroll(&mut roster, &mut learners, "Max", "Mustermann");

        assert_eq!(roster.count_students_by_last_name("Doe", &learners), 2);
        assert_eq!(roster.count_students_by_last_name("Smith", &learners), 0);
    }

    #[test]
    fn test_unregister_reports_removal() {
        let mut roster = SubjectRoster::new("CS", 101, 2);
        let key = StudentKey::from_names("John", "Doe");
        roster.register_student(key.clone());

        assert!(roster.unregister_student(&key));
        assert!(!roster.unregister_student(&key));
        assert!(!roster.is_student_enrolled("John", "Doe"));
    }

    #[test]
    fn test_clear_enrollments_decrements_learners() {
        let mut roster = SubjectRoster::new("CS", 101, 5);
        let mut learners = LearnerDirectory::new();
        enroll(&mut roster, &mut learners, "John", "Doe");
        enroll(&mut roster, &mut learners, "Jane", "Roe");

        roster.clear_enrollments(&mut learners);

        assert_eq!(roster.count_enrolled_students(), 0);
        for learner in learners.values() {
            assert_eq!(learner.enrolled_courses(), 0);
        }
    }
}
