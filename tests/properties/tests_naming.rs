//! Namespaces and scoped names over generated inputs.

use std::path::PathBuf;

use proptest::prelude::*;
use stylable::namespace::{is_valid_namespace, local_name_from_path};
use stylable::{CollisionChecked, HashNamespace, NamespaceResolver, VerbatimNamespace};

use crate::helpers::project::Project;

proptest! {
    #[test]
    fn prop_local_name_is_always_a_valid_namespace(stem in "[a-zA-Z0-9._ -]{1,16}") {
        let path = PathBuf::from(format!("/p/{stem}.st.css"));
        let name = local_name_from_path(&path);
        prop_assert!(is_valid_namespace(&name), "{name:?} from {path:?}");
    }

    #[test]
    fn prop_hash_namespace_is_deterministic(
        local in "[a-z][a-z0-9-]{0,8}",
        dir in "[a-z]{1,8}",
    ) {
        let origin = PathBuf::from(format!("/{dir}/{local}.st.css"));
        let first = HashNamespace.resolve(&local, &origin, None).unwrap();
        let second = HashNamespace.resolve(&local, &origin, None).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(first.starts_with(&local));
    }

    #[test]
    fn prop_hash_namespace_separates_origins(
        local in "[a-z]{1,6}",
        first in "[a-z]{1,8}",
        second in "[a-z]{1,8}",
    ) {
        prop_assume!(first != second);
        let first = HashNamespace
            .resolve(&local, &PathBuf::from(format!("/{first}/x.st.css")), None)
            .unwrap();
        let second = HashNamespace
            .resolve(&local, &PathBuf::from(format!("/{second}/x.st.css")), None)
            .unwrap();
        prop_assert_ne!(first, second);
    }

    #[test]
    fn prop_collision_check_rejects_only_foreign_origins(
        local in "[a-z][a-z0-9]{0,8}",
        first_dir in "[a-z]{1,6}",
        second_dir in "[a-z]{1,6}",
    ) {
        let checked = CollisionChecked::new(VerbatimNamespace);
        let first = PathBuf::from(format!("/{first_dir}/x.st.css"));
        let second = PathBuf::from(format!("/{second_dir}/x.st.css"));

        prop_assert!(checked.resolve(&local, &first, None).is_ok());
        prop_assert!(checked.resolve(&local, &first, None).is_ok());
        prop_assert_eq!(checked.resolve(&local, &second, None).is_ok(), first == second);
    }

    #[test]
    fn prop_every_class_is_scoped(names in prop::collection::btree_set("[a-z][a-z0-9]{0,6}", 1..6)) {
        let source: String = names.iter().map(|name| format!(".{name} {{}}\n")).collect();
        let project = Project::new(&[("entry.st.css", &source)]);
        let results = project.transform("entry.st.css");

        for name in &names {
            prop_assert_eq!(&results.exports.classes[name.as_str()], &format!("entry__{name}"));
        }
    }
}
