use super::*;
use async_trait::async_trait;
use client_core::{Connectivity, ProductStore, StoreError};
use shared::domain::{Product, ProductDraft};
use std::sync::{Arc, Mutex};

struct MemoryStore {
    products: Mutex<Vec<Product>>,
}

impl MemoryStore {
    fn with(products: Vec<Product>) -> Arc<Self> {
        Arc::new(Self {
            products: Mutex::new(products),
        })
    }

    fn snapshot(&self) -> Vec<Product> {
        self.products.lock().expect("store lock").clone()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.snapshot())
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<(), StoreError> {
        let mut products = self.products.lock().expect("store lock");
        let id = ProductId(products.len() as i64 + 1);
        products.push(Product {
            id,
            name: draft.name.clone(),
            price: draft.price,
            description: Some(draft.description.clone()),
            stock: draft.stock,
            created_at: None,
        });
        Ok(())
    }

    async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> Result<(), StoreError> {
        let mut products = self.products.lock().expect("store lock");
        let product = products
            .iter_mut()
            .find(|product| product.id == id)
            .ok_or_else(|| StoreError::rejected("Product not found"))?;
        product.name = draft.name.clone();
        product.price = draft.price;
        product.stock = draft.stock;
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        self.products
            .lock()
            .expect("store lock")
            .retain(|product| product.id != id);
        Ok(())
    }

    async fn probe(&self) -> Connectivity {
        Connectivity::Connected
    }
}

fn keyboard(id: i64) -> Product {
    Product {
        id: ProductId(id),
        name: "Keyboard".into(),
        price: 45.0,
        description: None,
        stock: 12,
        created_at: None,
    }
}

struct ScriptResult {
    editing_id: Option<ProductId>,
    form: FormFields,
    output: String,
}

async fn run_script(store: Arc<MemoryStore>, script: &'static str) -> ScriptResult {
    let surface = TerminalSurface::new(Vec::new(), script.as_bytes());
    let mut session = EditSession::new(store, surface);
    run(&mut session).await.expect("shell run");
    let editing_id = session.editing_id();
    let form = session.surface().form_fields();
    let output = String::from_utf8(session.into_surface().into_output()).expect("utf8");
    ScriptResult {
        editing_id,
        form,
        output,
    }
}

#[test]
fn parses_commands_and_aliases() {
    assert_eq!(parse_command("list"), Ok(ShellCommand::List));
    assert_eq!(parse_command("  LS "), Ok(ShellCommand::List));
    assert_eq!(parse_command(""), Ok(ShellCommand::Empty));
    assert_eq!(parse_command("edit 4"), Ok(ShellCommand::Edit(ProductId(4))));
    assert_eq!(parse_command("rm 9"), Ok(ShellCommand::Delete(ProductId(9))));
    assert_eq!(parse_command("new"), Ok(ShellCommand::Cancel));
    assert_eq!(parse_command("exit"), Ok(ShellCommand::Quit));
}

#[test]
fn set_keeps_the_rest_of_the_line_as_value() {
    assert_eq!(
        parse_command("set description  a very  long text "),
        Ok(ShellCommand::Set(
            FormField::Description,
            "a very  long text".into()
        ))
    );
    assert_eq!(
        parse_command("set price"),
        Ok(ShellCommand::Set(FormField::Price, String::new()))
    );
}

#[test]
fn rejects_unknown_input() {
    assert!(parse_command("edit abc").is_err());
    assert!(parse_command("delete").is_err());
    assert!(parse_command("set colour red").is_err());
    assert!(parse_command("frobnicate").is_err());
}

#[test]
fn set_field_writes_the_matching_form_entry() {
    let mut form = FormFields::default();
    set_field(&mut form, &FormField::Name, "Lamp".into());
    set_field(&mut form, &FormField::Stock, "3".into());
    assert_eq!(form.name, "Lamp");
    assert_eq!(form.stock, "3");
    assert!(form.price.is_empty());
}

#[tokio::test]
async fn script_creates_a_product() {
    let store = MemoryStore::with(Vec::new());
    let result = run_script(
        store.clone(),
        "set name Lamp\nset price 20\nset stock 4\nsubmit\nquit\n",
    )
    .await;

    let products = store.snapshot();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Lamp");
    assert!(result.output.contains("[ok] Product created"));
    assert!(result.form.is_blank());
}

#[tokio::test]
async fn script_edits_then_cancels() {
    let store = MemoryStore::with(vec![keyboard(1)]);
    let result = run_script(store.clone(), "edit 1\ncancel\n").await;

    assert!(result.output.contains("Edit Product"));
    assert!(result.output.contains("inventory (editing #1)> "));
    assert_eq!(result.editing_id, None);
    assert_eq!(store.snapshot()[0].name, "Keyboard");
}

#[tokio::test]
async fn script_updates_edited_product() {
    let store = MemoryStore::with(vec![keyboard(1)]);
    let result = run_script(store.clone(), "edit 1\nset price 50.5\nsubmit\n").await;

    assert_eq!(store.snapshot()[0].price, 50.5);
    assert!(result.output.contains("[ok] Product updated"));
}

#[tokio::test]
async fn delete_uses_the_listed_name_in_the_prompt() {
    let store = MemoryStore::with(vec![keyboard(1)]);
    let result = run_script(store.clone(), "delete 1\ny\n").await;

    assert!(result.output.contains("Are you sure you want to delete \"Keyboard\"?"));
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn declined_delete_keeps_the_product() {
    let store = MemoryStore::with(vec![keyboard(1)]);
    run_script(store.clone(), "delete 1\nn\n").await;
    assert_eq!(store.snapshot().len(), 1);
}

#[tokio::test]
async fn bad_command_prints_a_hint_and_continues() {
    let store = MemoryStore::with(Vec::new());
    let result = run_script(store, "dance\nhelp\n").await;
    assert!(result.output.contains("unknown command `dance`"));
    assert!(result.output.contains("set <field> <value>"));
}
