use crate::core::learner::Learner;
use crate::core::roster::{LearnerDirectory, SubjectRoster};
use crate::domain::model::{CatalogSnapshot, LearnerSnapshot, StudentKey};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_positive_number, validate_student_name, validate_subject_id,
};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// 所有課程與學生目錄。
///
/// 整個目錄只有一把鎖：每個公開方法（含唯讀查詢）都在單次呼叫期間持有它，
/// 因此 enroll / withdraw 內部的「先檢查再寫入」不會與其他執行緒交錯。
/// 跨課程的操作（例如 `cancel_all_enrollments`）也因此能看到一致的狀態。
#[derive(Debug)]
pub struct Catalog {
    state: Mutex<CatalogState>,
}

#[derive(Debug)]
struct CatalogState {
    max_courses: u32,
    subjects: BTreeMap<String, BTreeMap<u32, SubjectRoster>>,
    learners: LearnerDirectory,
}

impl Catalog {
    /// `max_courses` 小於 1 時以 1 計
    pub fn new(max_courses: u32) -> Self {
        Self {
            state: Mutex::new(CatalogState {
                max_courses: max_courses.max(1),
                subjects: BTreeMap::new(),
                learners: LearnerDirectory::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        // 所有操作在可能 panic 之前不會留下半套修改，poison 後可直接沿用
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn max_courses_per_student(&self) -> u32 {
        self.lock().max_courses
    }

    /// 新增課程，回傳是否為新建立。
    ///
    /// 已存在的 (系所, 課號) 不做任何事，也不會重設座位數或名單。
    pub fn add_subject(&self, department: &str, course_number: u32, seat_count: u32) -> Result<bool> {
        validate_subject_id(department, course_number)?;
        validate_positive_number("seat_count", seat_count, 1)?;

        let mut state = self.lock();
        let created = {
            let courses = state.subjects.entry(department.to_string()).or_default();
            match courses.entry(course_number) {
                Entry::Occupied(_) => false,
                Entry::Vacant(slot) => {
                    slot.insert(SubjectRoster::new(department, course_number, seat_count));
                    true
                }
            }
        };

        if created {
            tracing::debug!("Added subject {} {} with {} seats", department, course_number, seat_count);
        }
        Ok(created)
    }

    pub fn remove_subject(&self, department: &str, course_number: u32) -> Result<bool> {
        validate_subject_id(department, course_number)?;

        let mut state = self.lock();
        let CatalogState {
            subjects, learners, ..
        } = &mut *state;

        let Some(courses) = subjects.get_mut(department) else {
            return Ok(false);
        };
        let Some(mut roster) = courses.remove(&course_number) else {
            return Ok(false);
        };
        if courses.is_empty() {
            subjects.remove(department);
        }

        tracing::debug!(
            "Removing subject {} {} with {} enrolled",
            department,
            course_number,
            roster.count_enrolled_students()
        );
        roster.clear_enrollments(learners);
        Ok(true)
    }

    pub fn count_subjects(&self) -> usize {
        self.lock().subjects.values().map(BTreeMap::len).sum()
    }

    /// 選課。課程不存在、已額滿、已選過或學生已達上限時回傳 `Ok(false)`。
    pub fn enroll_student(
        &self,
        department: &str,
        course_number: u32,
        first_name: &str,
        last_name: &str,
    ) -> Result<bool> {
        validate_subject_id(department, course_number)?;
        validate_student_name(first_name, last_name)?;

        let mut state = self.lock();
        let max_courses = state.max_courses;
        let CatalogState {
            subjects, learners, ..
        } = &mut *state;

        let Some(roster) = subjects
            .get_mut(department)
            .and_then(|courses| courses.get_mut(&course_number))
        else {
            return Ok(false);
        };
        if roster.is_full() || roster.is_student_enrolled(first_name, last_name) {
            return Ok(false);
        }

        let key = StudentKey::from_names(first_name, last_name);
        let learner = learners
            .entry(key.clone())
            .or_insert_with(|| Learner::new(first_name, last_name, max_courses));
        if !learner.can_enroll_in_another_course() {
            return Ok(false);
        }

        roster.register_student(key);
        learner.enroll();
        Ok(true)
    }

    pub fn count_students_in_subject(&self, department: &str, course_number: u32) -> usize {
        let state = self.lock();
        state
            .roster(department, course_number)
            .map(SubjectRoster::count_enrolled_students)
            .unwrap_or(0)
    }

    pub fn count_students_with_last_name(
        &self,
        department: &str,
        course_number: u32,
        last_name: &str,
    ) -> usize {
        let state = self.lock();
        state
            .roster(department, course_number)
            .map(|roster| roster.count_students_by_last_name(last_name, &state.learners))
            .unwrap_or(0)
    }

    pub fn is_student_enrolled(
        &self,
        department: &str,
        course_number: u32,
        first_name: &str,
        last_name: &str,
    ) -> bool {
        let state = self.lock();
        state
            .roster(department, course_number)
            .is_some_and(|roster| roster.is_student_enrolled(first_name, last_name))
    }

    /// 掃描所有課程，計算該學生出現在幾個名單中
    pub fn count_courses_student_enrolled(&self, first_name: &str, last_name: &str) -> usize {
        let state = self.lock();
        state
            .rosters()
            .filter(|roster| roster.is_student_enrolled(first_name, last_name))
            .count()
    }

    /// 學生目錄中記錄的選課數；從未嘗試選課的學生為 0
    pub fn learner_course_count(&self, first_name: &str, last_name: &str) -> u32 {
        let state = self.lock();
        state
            .learners
            .get(&StudentKey::from_names(first_name, last_name))
            .map(Learner::enrolled_courses)
            .unwrap_or(0)
    }

    pub fn seat_count(&self, department: &str, course_number: u32) -> Option<u32> {
        let state = self.lock();
        state
            .roster(department, course_number)
            .map(SubjectRoster::total_seats)
    }

    pub fn withdraw_student(
        &self,
        department: &str,
        course_number: u32,
        first_name: &str,
        last_name: &str,
    ) -> Result<bool> {
        validate_subject_id(department, course_number)?;
        validate_student_name(first_name, last_name)?;

        let mut state = self.lock();
        let CatalogState {
            subjects, learners, ..
        } = &mut *state;

        let Some(roster) = subjects
            .get_mut(department)
            .and_then(|courses| courses.get_mut(&course_number))
        else {
            return Ok(false);
        };

        let key = StudentKey::from_names(first_name, last_name);
        if !roster.unregister_student(&key) {
            return Ok(false);
        }
        if let Some(learner) = learners.get_mut(&key) {
            learner.withdraw();
        }
        Ok(true)
    }

    /// 將學生從所有課程退選；有任何一筆被移除則回傳 true
    pub fn cancel_all_enrollments(&self, first_name: &str, last_name: &str) -> Result<bool> {
        validate_student_name(first_name, last_name)?;

        let mut state = self.lock();
        let CatalogState {
            subjects, learners, ..
        } = &mut *state;

        let key = StudentKey::from_names(first_name, last_name);
        let mut removed = 0usize;
        for roster in subjects.values_mut().flat_map(BTreeMap::values_mut) {
            if roster.unregister_student(&key) {
                if let Some(learner) = learners.get_mut(&key) {
                    learner.withdraw();
                }
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::debug!("Cancelled {} enrollment(s) for {}", removed, key);
        }
        Ok(removed > 0)
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        let state = self.lock();

        let mut learners: Vec<LearnerSnapshot> = state
            .learners
            .values()
            .map(|learner| LearnerSnapshot {
                given_name: learner.given_name().to_string(),
                family_name: learner.family_name().to_string(),
                enrolled_courses: learner.enrolled_courses(),
            })
            .collect();
        learners.sort_by(|a, b| {
            (&a.family_name, &a.given_name).cmp(&(&b.family_name, &b.given_name))
        });

        CatalogSnapshot {
            max_courses_per_student: state.max_courses,
            subjects: state.rosters().map(SubjectRoster::snapshot).collect(),
            learners,
        }
    }
}

impl CatalogState {
    fn roster(&self, department: &str, course_number: u32) -> Option<&SubjectRoster> {
        self.subjects
            .get(department)
            .and_then(|courses| courses.get(&course_number))
    }

    fn rosters(&self) -> impl Iterator<Item = &SubjectRoster> {
        self.subjects.values().flat_map(BTreeMap::values)
    }
}
