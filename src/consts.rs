// Global safety caps to prevent pathological or infinite loops

// Parser: maximum tokens skipped while recovering from a malformed entry
pub const PARSER_MAX_RECOVERY_SKIP: usize = 200_000;
// Parser: maximum nesting depth of annotation values ({...} and nested @A(...))
pub const PARSER_MAX_VALUE_DEPTH: usize = 64;

// Descriptor decoder: maximum array dimensions (JVMS 4.3.2)
pub const DESCRIPTOR_MAX_ARRAY_DIMS: usize = 255;

// Reserved member names in method descriptors
pub const CONSTRUCTOR_NAME: &str = "<init>";
pub const STATIC_INIT_NAME: &str = "<clinit>";

// Nested-class delimiter in binary names
pub const NESTED_CLASS_DELIMITER: char = '$';

// Meta-annotations read while deriving annotation type descriptors
pub const RETENTION_ANNOTATION: &str = "java.lang.annotation.Retention";
pub const TARGET_ANNOTATION: &str = "java.lang.annotation.Target";

// Annotations consumed by the downstream passes
pub const REFLECTION_SUPPORT_ANNOTATION: &str = "com.google.j2objc.annotations.ReflectionSupport";
pub const OBJECTIVE_C_NAME_ANNOTATION: &str = "com.google.j2objc.annotations.ObjectiveCName";

// Classes descending from this base hide renamed methods' original names in metadata
pub const JUNIT3_TEST_CASE: &str = "junit.framework.TestCase";

// Simple names recognised as nullability annotations, regardless of package
pub const NONNULL_ANNOTATION_NAMES: &[&str] = &["Nonnull", "NonNull", "NotNull"];
pub const NULLABLE_ANNOTATION_NAMES: &[&str] = &["Nullable", "CheckForNull", "NullableDecl"];

// Element name used for a single positional annotation value
pub const DEFAULT_ELEMENT_NAME: &str = "value";

// File extension picked up when scanning annotation directories
pub const INDEX_FILE_EXTENSION: &str = "jaif";
