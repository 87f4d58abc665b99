//! Method-name classification for audited operations
//!
//! Each action has its own list of method-name prefixes. Rules are evaluated
//! independently, so a name that matched more than one rule would be audited
//! once per matching action.

use std::borrow::Cow;

use super::models::AuditAction;

/// Prefixes that mark a method as one audit action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixRule {
    pub action: AuditAction,
    pub prefixes: &'static [&'static str],
}

impl PrefixRule {
    /// Case-sensitive prefix match
    pub fn matches(&self, method: &str) -> bool {
        self.prefixes.iter().any(|prefix| method.starts_with(prefix))
    }
}

pub const CREATE_RULE: PrefixRule = PrefixRule {
    action: AuditAction::Create,
    prefixes: &["create", "save", "add", "insert"],
};

pub const UPDATE_RULE: PrefixRule = PrefixRule {
    action: AuditAction::Update,
    prefixes: &["update", "modify", "edit", "approve", "reject"],
};

pub const DELETE_RULE: PrefixRule = PrefixRule {
    action: AuditAction::Delete,
    prefixes: &["delete", "remove"],
};

/// Maps method names to the audit actions they trigger
#[derive(Debug, Clone)]
pub struct MethodClassifier {
    rules: Vec<PrefixRule>,
}

impl Default for MethodClassifier {
    fn default() -> Self {
        Self::new(vec![CREATE_RULE, UPDATE_RULE, DELETE_RULE])
    }
}

impl MethodClassifier {
    pub fn new(rules: Vec<PrefixRule>) -> Self {
        Self { rules }
    }

    /// Every action whose rule matches `method`, in rule order.
    ///
    /// An empty result means the method is not audited.
    pub fn classify(&self, method: &str) -> Vec<AuditAction> {
        let method = method_label(method);
        self.rules
            .iter()
            .filter(|rule| rule.matches(&method))
            .map(|rule| rule.action)
            .collect()
    }

    pub fn is_audited(&self, method: &str) -> bool {
        let method = method_label(method);
        self.rules.iter().any(|rule| rule.matches(&method))
    }
}

/// `<ServiceName>.<methodName>`, with snake_case method names rendered in camelCase
pub fn operation_label(service: &str, method: &str) -> String {
    format!("{}.{}", service, method_label(method))
}

/// `create_teacher` -> `createTeacher`; camelCase names pass through untouched
pub fn method_label(method: &str) -> Cow<'_, str> {
    if !method.contains('_') {
        return Cow::Borrowed(method);
    }

    let mut label = String::with_capacity(method.len());
    let mut upper_next = false;
    for c in method.chars() {
        if c == '_' {
            // Leading underscores stay as-is so the label never starts uppercase
            upper_next = !label.is_empty();
            if label.is_empty() {
                label.push(c);
            }
        } else if upper_next {
            label.extend(c.to_uppercase());
            upper_next = false;
        } else {
            label.push(c);
        }
    }
    Cow::Owned(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_prefixes() {
        let classifier = MethodClassifier::default();
        for method in ["createTeacher", "saveSection", "addStudent", "insertRow"] {
            assert_eq!(classifier.classify(method), vec![AuditAction::Create], "{method}");
        }
    }

    #[test]
    fn test_update_prefixes() {
        let classifier = MethodClassifier::default();
        for method in [
            "updateTeacher",
            "modifySchedule",
            "editCourse",
            "approveRequest",
            "rejectRequest",
        ] {
            assert_eq!(classifier.classify(method), vec![AuditAction::Update], "{method}");
        }
    }

    #[test]
    fn test_delete_prefixes() {
        let classifier = MethodClassifier::default();
        for method in ["deleteEmailTemplate", "removeOutboxMessage"] {
            assert_eq!(classifier.classify(method), vec![AuditAction::Delete], "{method}");
        }
    }

    #[test]
    fn test_unmatched_names_are_not_audited() {
        let classifier = MethodClassifier::default();
        for method in ["findTeacher", "getAllTeachers", "sendEmail", "listOutbox", ""] {
            assert!(classifier.classify(method).is_empty(), "{method}");
            assert!(!classifier.is_audited(method));
        }
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let classifier = MethodClassifier::default();
        assert!(classifier.classify("CreateTeacher").is_empty());
        assert!(classifier.classify("DELETE_ALL").is_empty());
    }

    #[test]
    fn test_snake_case_methods_classify_like_camel_case() {
        let classifier = MethodClassifier::default();
        assert_eq!(classifier.classify("create_teacher"), vec![AuditAction::Create]);
        assert_eq!(classifier.classify("remove_outbox_message"), vec![AuditAction::Delete]);
        assert!(classifier.classify("find_teacher").is_empty());
    }

    #[test]
    fn test_rules_match_independently() {
        const ARCHIVE_AS_DELETE: PrefixRule = PrefixRule {
            action: AuditAction::Delete,
            prefixes: &["updateAnd"],
        };
        let classifier = MethodClassifier::new(vec![CREATE_RULE, UPDATE_RULE, ARCHIVE_AS_DELETE]);

        assert_eq!(
            classifier.classify("updateAndArchive"),
            vec![AuditAction::Update, AuditAction::Delete]
        );
    }

    #[test]
    fn test_operation_label() {
        assert_eq!(
            operation_label("TeacherService", "create_teacher"),
            "TeacherService.createTeacher"
        );
        assert_eq!(
            operation_label("TeacherService", "createTeacher"),
            "TeacherService.createTeacher"
        );
        assert_eq!(
            operation_label("EmailService", "delete_email_template"),
            "EmailService.deleteEmailTemplate"
        );
    }

    #[test]
    fn test_method_label_edge_cases() {
        assert_eq!(method_label("_internal_call"), "_internalCall");
        assert_eq!(method_label("trailing_"), "trailing");
        assert_eq!(method_label("a__b"), "aB");
    }
}
