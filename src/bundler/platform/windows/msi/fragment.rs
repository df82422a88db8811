//! Fragment compilation.
//!
//! Walks a populated [`TreeNode`] and emits one `<Directory>` fragment per
//! node, with a `<Component>` per file and per registry value. Each call
//! returns the components it produced; callers fold them into their own
//! result, so one compilation never shares state with another.

use super::{
    Feature, ROOTDIR_NAME,
    id::IdGenerator,
    registry::Registry,
    template::{self, Templates},
    tree::{File, TreeNode},
    utils::escape_xml,
};
use crate::bundler::error::{Error, Result};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Indentation of the install root inside the master document.
pub const ROOT_INDENT: usize = 8;
/// Indentation added per nesting level.
pub const INDENT_STEP: usize = 2;
/// Id of the extra directory level when installing into a nested folder.
pub const PARENT_DIR_NAME: &str = "APPLICATIONPARENTDIRECTORY";

const CLOSING_COMPONENT_TAG: &str = "</Component>";

/// One installable component.
#[derive(Clone, Debug)]
pub struct Component {
    pub guid: Uuid,
    pub component_id: String,
    pub xml: String,
    pub feature: Feature,
    /// Originating file, `None` for registry components.
    pub file: Option<File>,
}

/// Reference to a component from a feature block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComponentRef {
    pub component_id: String,
    pub xml: String,
}

/// Output of compiling one directory node.
#[derive(Clone, Debug, Default)]
pub struct DirectoryFragment {
    pub xml: String,
    pub components: Vec<Component>,
}

/// References partitioned by feature.
#[derive(Clone, Debug, Default)]
pub struct FeatureReferences {
    pub main: Vec<ComponentRef>,
    pub auto_update: Vec<ComponentRef>,
    pub auto_launch: Vec<ComponentRef>,
}

impl FeatureReferences {
    /// References of `feature`.
    pub fn get(&self, feature: Feature) -> &[ComponentRef] {
        match feature {
            Feature::Main => &self.main,
            Feature::AutoUpdate => &self.auto_update,
            Feature::AutoLaunch => &self.auto_launch,
        }
    }

    /// Number of references across all features.
    pub fn total(&self) -> usize {
        self.main.len() + self.auto_update.len() + self.auto_launch.len()
    }
}

/// The compiled install root.
#[derive(Clone, Debug)]
pub struct CompiledTree {
    /// `<Directory>` fragment for the install root, spliced into the
    /// program files directory of the master document.
    pub directories: String,
    pub components: Vec<Component>,
}

impl CompiledTree {
    /// Renders the references of every feature.
    pub fn references(&self, templates: &Templates) -> Result<FeatureReferences> {
        Ok(FeatureReferences {
            main: components_by_feature(templates, &self.components, Feature::Main)?,
            auto_update: components_by_feature(templates, &self.components, Feature::AutoUpdate)?,
            auto_launch: components_by_feature(templates, &self.components, Feature::AutoLaunch)?,
        })
    }

    /// Checks that every authored component has exactly one reference.
    pub fn verify(&self, references: &FeatureReferences) -> Result<()> {
        let components = self.directories.matches(CLOSING_COMPONENT_TAG).count();
        if components != references.total() || components != self.components.len() {
            return Err(Error::ComponentMismatch {
                components,
                references: references.total(),
            });
        }
        Ok(())
    }
}

/// Renders one reference per component of `feature`, in component order.
pub fn components_by_feature(
    templates: &Templates,
    components: &[Component],
    feature: Feature,
) -> Result<Vec<ComponentRef>> {
    let indent = " ".repeat(ROOT_INDENT);
    components
        .iter()
        .filter(|component| component.feature == feature)
        .map(|component| {
            let mut data = BTreeMap::new();
            data.insert("indent", indent.clone());
            data.insert("component_id", component.component_id.clone());
            let xml = templates.render(template::COMPONENT_REF, &data)?;
            Ok(ComponentRef {
                component_id: component.component_id.clone(),
                xml,
            })
        })
        .collect()
}

/// Recursive directory compiler.
#[derive(Debug)]
pub struct FragmentCompiler<'a> {
    templates: &'a Templates,
    ids: IdGenerator,
    win64: &'static str,
    nested_folder_name: Option<String>,
}

impl<'a> FragmentCompiler<'a> {
    /// `win64` is the `Win64` attribute value for every component.
    pub fn new(templates: &'a Templates, ids: IdGenerator, win64: &'static str) -> Self {
        Self {
            templates,
            ids,
            win64,
            nested_folder_name: None,
        }
    }

    /// Installs the root into an extra folder level named `name`.
    pub fn nested_folder_name(mut self, name: Option<String>) -> Self {
        self.nested_folder_name = name;
        self
    }

    /// Hands back the id generator once compilation is done.
    pub fn into_ids(self) -> IdGenerator {
        self.ids
    }

    /// Compiles the install root as `APPLICATIONROOTDIRECTORY` named `name`.
    pub fn compile_root(&mut self, tree: &TreeNode, name: &str) -> Result<CompiledTree> {
        let nested = self.nested_folder_name.clone();
        let fragment =
            self.compile_node(tree, ROOT_INDENT, name, Some(ROOTDIR_NAME), nested.as_deref())?;
        log::debug!(
            "Compiled {} components below {}",
            fragment.components.len(),
            tree.path.display()
        );
        Ok(CompiledTree {
            directories: fragment.xml,
            components: fragment.components,
        })
    }

    /// Compiles `node` and everything below it.
    ///
    /// Without an explicit `id` one is generated from the node's path.
    pub fn compile_directory(
        &mut self,
        node: &TreeNode,
        indent: usize,
        name: &str,
        id: Option<&str>,
    ) -> Result<DirectoryFragment> {
        self.compile_node(node, indent, name, id, None)
    }

    fn compile_node(
        &mut self,
        node: &TreeNode,
        indent: usize,
        name: &str,
        id: Option<&str>,
        nested: Option<&str>,
    ) -> Result<DirectoryFragment> {
        let child_indent = indent + INDENT_STEP;
        let mut components = Vec::new();

        let mut directories = Vec::with_capacity(node.children.len());
        for child in node.children.values() {
            let fragment =
                self.compile_directory(child, child_indent, &child.display_name, None)?;
            directories.push(fragment.xml);
            components.extend(fragment.components);
        }

        let mut files = Vec::with_capacity(node.files.len());
        for file in &node.files {
            let component = self.file_component(file, child_indent)?;
            files.push(component.xml.clone());
            components.push(component);
        }

        let mut registry = Vec::with_capacity(node.registry.len());
        for entry in &node.registry {
            let component = self.registry_component(entry, child_indent)?;
            registry.push(component.xml.clone());
            components.push(component);
        }

        let mut children = [directories.join("\n"), files.join("\n")]
            .into_iter()
            .filter(|block| !block.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if !registry.is_empty() {
            // blank line before registry values
            children.push_str(if children.is_empty() { "\n" } else { "\n\n" });
            children.push_str(&registry.join("\n"));
        }

        let directory_id = match id {
            Some(id) => id.to_string(),
            None => self.ids.make_id(&node.path),
        };

        let mut data = BTreeMap::new();
        data.insert("indent", " ".repeat(indent));
        data.insert("directory_id", directory_id);
        data.insert("directory_name", escape_xml(name));
        data.insert("children", children);

        let xml = match nested {
            Some(nested) => {
                data.insert("parent_id", PARENT_DIR_NAME.to_string());
                data.insert("nested_directory_name", escape_xml(nested));
                self.templates
                    .render(template::DIRECTORY_NESTED_INSTALL, &data)?
            }
            None => self.templates.render(template::DIRECTORY, &data)?,
        };

        Ok(DirectoryFragment { xml, components })
    }

    fn file_component(&mut self, file: &File, indent: usize) -> Result<Component> {
        let guid = self.ids.guid();
        let component_id = self.ids.make_id(&file.path);

        let mut data = BTreeMap::new();
        data.insert("indent", " ".repeat(indent));
        data.insert("component_id", component_id.clone());
        data.insert("file_id", component_id.clone());
        data.insert("name", escape_xml(&file.name));
        data.insert("guid", guid.to_string());
        data.insert("source", escape_xml(&file.path.to_string_lossy()));
        data.insert("win64", self.win64.to_string());

        Ok(Component {
            guid,
            component_id,
            xml: self.templates.render(template::FILE_COMPONENT, &data)?,
            feature: file.feature,
            file: Some(file.clone()),
        })
    }

    fn registry_component(&mut self, registry: &Registry, indent: usize) -> Result<Component> {
        let guid = self.ids.guid();

        let permission = match &registry.permission {
            Some(permission) => {
                let mut data = BTreeMap::new();
                data.insert("indent", " ".repeat(indent + 4));
                data.insert("user", permission.user.clone());
                data.insert("generic_all", yes_no(permission.generic_all).to_string());
                self.templates.render(template::PERMISSION, &data)?
            }
            None => String::new(),
        };

        let mut data = BTreeMap::new();
        data.insert("indent", " ".repeat(indent));
        data.insert("component_id", registry.id.clone());
        data.insert("guid", guid.to_string());
        data.insert("win64", self.win64.to_string());
        data.insert("root", registry.root.as_str().to_string());
        data.insert("key", registry.key.clone());
        data.insert("name", registry.name.clone());
        data.insert("value", registry.value.clone());
        data.insert("value_type", registry.value_type.as_str().to_string());
        data.insert(
            "force_create_on_install",
            yes_no(registry.force_create_on_install).to_string(),
        );
        data.insert(
            "force_delete_on_uninstall",
            yes_no(registry.force_delete_on_uninstall).to_string(),
        );
        data.insert("permission", permission);

        Ok(Component {
            guid,
            component_id: registry.id.clone(),
            xml: self.templates.render(template::REGISTRY_COMPONENT, &data)?,
            feature: registry.feature,
            file: None,
        })
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
