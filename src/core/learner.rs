/// 學生的選課數量紀錄。
///
/// 本身不加鎖，一致性由 `Catalog` 的鎖保證。
#[derive(Debug, Clone)]
pub struct Learner {
    given_name: String,
    family_name: String,
    enrolled_courses: u32,
    max_courses: u32,
}

impl Learner {
    pub fn new(given_name: &str, family_name: &str, max_courses: u32) -> Self {
        Self {
            given_name: given_name.to_string(),
            family_name: family_name.to_string(),
            enrolled_courses: 0,
            max_courses,
        }
    }

    /// 呼叫端必須先確認 `can_enroll_in_another_course`
    pub fn enroll(&mut self) {
        self.enrolled_courses += 1;
    }

    /// 已為 0 時不做任何事
    pub fn withdraw(&mut self) {
        self.enrolled_courses = self.enrolled_courses.saturating_sub(1);
    }

    pub fn can_enroll_in_another_course(&self) -> bool {
        self.enrolled_courses < self.max_courses
    }

    pub fn has_family_name(&self, last_name: &str) -> bool {
        self.family_name == last_name
    }

    pub fn given_name(&self) -> &str {
        &self.given_name
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn enrolled_courses(&self) -> u32 {
        self.enrolled_courses
    }
}
