//! MCP server exposing category trees to chat-based AI clients.

mod types;

pub use types::*;

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};

use crate::models::*;
use crate::tree::CategoryTree;

#[derive(Clone)]
pub struct McpServer {
    tree: CategoryTree,
    tool_router: ToolRouter<Self>,
}

fn mcp_error(e: TreeError) -> McpError {
    if e.is_fatal() {
        tracing::error!("MCP tool failed: {:#}", e);
        McpError::internal_error(e.to_string(), None)
    } else {
        McpError::invalid_params(e.to_string(), None)
    }
}

fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

impl McpServer {
    pub fn new(tree: CategoryTree) -> Self {
        Self {
            tree,
            tool_router: Self::tool_router(),
        }
    }

    // ============================================================
    // Tool logic, callable without the protocol layer
    // ============================================================

    pub fn call_view_tree(&self, owner_id: OwnerId) -> Result<String, McpError> {
        self.tree.render(owner_id).map_err(mcp_error)
    }

    pub fn call_add_root(&self, owner_id: OwnerId, name: &str) -> Result<Outcome, McpError> {
        self.tree.add_root(owner_id, name).map_err(mcp_error)
    }

    pub fn call_add_child(&self, owner_id: OwnerId, path: &str) -> Result<Outcome, McpError> {
        self.tree.add_child_text(owner_id, path).map_err(mcp_error)
    }

    pub fn call_remove(&self, owner_id: OwnerId, name: &str) -> Result<Outcome, McpError> {
        self.tree.remove(owner_id, name).map_err(mcp_error)
    }

    pub fn call_export(&self, owner_id: OwnerId) -> Result<ExportTableResponse, McpError> {
        let rows = self.tree.export(owner_id).map_err(mcp_error)?;
        Ok(ExportTableResponse {
            header: TABLE_HEADER.iter().map(|h| h.to_string()).collect(),
            rows: rows.into_iter().map(|r| [r.category, r.parent]).collect(),
        })
    }

    pub fn call_import(
        &self,
        owner_id: OwnerId,
        rows: Vec<TableRowInput>,
    ) -> Result<Outcome, McpError> {
        let rows = rows.into_iter().map(TableRow::from).collect();
        self.tree.import(owner_id, rows).map_err(mcp_error)
    }
}

#[tool_router]
impl McpServer {
    #[tool(
        description = "Show a chat's category tree as an indented outline. Each line is one category; children are indented four spaces deeper than their parent. Returns 'There are no categories' for an empty tree."
    )]
    async fn view_tree(
        &self,
        params: Parameters<ViewTreeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let outline = self.call_view_tree(params.0.owner_id)?;
        Ok(text_result(outline))
    }

    #[tool(
        description = "Add a root category (no parent). Fails if a category with the same name already exists in this chat; names are case-sensitive."
    )]
    async fn add_root_category(
        &self,
        params: Parameters<AddRootCategoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let outcome = self.call_add_root(req.owner_id, &req.name)?;
        Ok(text_result(outcome.to_string()))
    }

    #[tool(
        description = "Add a child category under an existing parent, or move an existing category there. Pass parent and child as one space-separated path; the shortest leading words naming an existing category are the parent."
    )]
    async fn add_child_category(
        &self,
        params: Parameters<AddChildCategoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let outcome = self.call_add_child(req.owner_id, &req.path)?;
        Ok(text_result(outcome.to_string()))
    }

    #[tool(
        description = "Remove a category and every category beneath it. Side effect: the whole subtree is deleted."
    )]
    async fn remove_category(
        &self,
        params: Parameters<RemoveCategoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let outcome = self.call_remove(req.owner_id, &req.name)?;
        Ok(text_result(outcome.to_string()))
    }

    #[tool(
        description = "Export a chat's tree as a two-column table (Category, Parent Category) in outline order. Root categories have '-' as parent."
    )]
    async fn export_table(
        &self,
        params: Parameters<ExportTableRequest>,
    ) -> Result<CallToolResult, McpError> {
        let response = self.call_export(params.0.owner_id)?;
        let json = serde_json::to_string_pretty(&response)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(text_result(json))
    }

    #[tool(
        description = "Import table rows into a chat's tree in one step. Unknown parents are created as root categories. Existing categories whose parent also exists are left where they are."
    )]
    async fn import_table(
        &self,
        params: Parameters<ImportTableRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let outcome = self.call_import(req.owner_id, req.rows)?;
        Ok(text_result(outcome.to_string()))
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: rmcp::model::Implementation {
                name: "category-tree".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            instructions: Some(
                r#"Category Tree keeps one independent tree of named categories per chat (owner_id).

NAMES:
- Names are unique within a chat and case-sensitive.
- Names may contain spaces.

ADDING:
- add_root_category creates a top-level category.
- add_child_category takes "<parent> <child>" as one string. The parent is the SHORTEST
  leading run of words that names an existing category, so with "Fruit" and "Fruit Tree"
  both present, "Fruit Tree Red" adds "Tree Red" under "Fruit".
- Adding a child that already exists moves it under the new parent.

REMOVING:
- remove_category deletes the category and its whole subtree.

TABLES:
- export_table / import_table use two columns: Category, Parent Category.
- "-" in Parent Category marks a root."#
                    .into(),
            ),
            ..Default::default()
        }
    }
}

pub async fn run_stdio_server(tree: CategoryTree) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!("Starting MCP server via stdio");

    let service = McpServer::new(tree);
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}
