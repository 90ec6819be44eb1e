use axum::{response::Html, routing::get, Router};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Datalyst - AI Data Analyst</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 2rem; color: #1d1d1f; max-width: 900px; }
    h1 { margin-bottom: 0.5rem; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
    label { display: block; margin-top: 0.75rem; font-weight: 600; }
    input[type=text], textarea { width: 100%; padding: 0.5rem; }
    button { margin-top: 1rem; padding: 0.6rem 1rem; }
    pre { background: #f6f8fa; padding: 1rem; overflow: auto; white-space: pre-wrap; }
    .chip { display: inline-block; background: #eef; border-radius: 12px; padding: 0.2rem 0.7rem;
            margin: 0.2rem; cursor: pointer; font-size: 0.85rem; }
    .file-row { margin: 0.25rem 0; }
  </style>
</head>
<body>
  <h1>Datalyst</h1>
  <p>Upload CSV or Excel files, select them, and ask questions about your data.</p>

  <div class="card">
    <h2>1) Upload data</h2>
    <input id="fileInput" type="file" accept=".csv,.xlsx,.xls" />
    <button id="uploadBtn">Upload</button>
    <div id="uploadStatus"></div>
  </div>

  <div class="card">
    <h2>2) Select files</h2>
    <div id="fileList">Loading...</div>
  </div>

  <div class="card">
    <h2>3) Ask a question</h2>
    <span class="chip" onclick="setQuery('give me a summary of this data')">Summary</span>
    <span class="chip" onclick="setQuery('top performers by sales')">Top</span>
    <span class="chip" onclick="setQuery('compare categories')">Compare</span>
    <span class="chip" onclick="setQuery('sales trends over time')">Trends</span>
    <span class="chip" onclick="setQuery('profit analysis')">Profits</span>
    <span class="chip" onclick="setQuery('breakdown by region')">Regions</span>
    <textarea id="query" rows="3" placeholder="e.g. which products sell best?"></textarea>
    <label><input id="webSearch" type="checkbox" /> Search the web instead of my files</label>
    <button id="askBtn">Analyze</button>
  </div>

  <div class="card">
    <h2>Result</h2>
    <h3 id="resultTitle"></h3>
    <pre id="output"></pre>
  </div>

  <script>
    const output = document.getElementById('output');
    const resultTitle = document.getElementById('resultTitle');
    const uploadStatus = document.getElementById('uploadStatus');

    function setQuery(q) { document.getElementById('query').value = q; }

    async function refreshFiles() {
      const res = await fetch('/api/files');
      const files = await res.json();
      const list = document.getElementById('fileList');
      if (!files.length) { list.textContent = 'No files uploaded yet.'; return; }
      list.innerHTML = files.map(f =>
        '<div class="file-row"><label><input type="checkbox" class="file-check" value="' +
        f.name + '" /> ' + f.name + ' (' + f.size + ' bytes)</label></div>'
      ).join('');
    }

    document.getElementById('uploadBtn').onclick = async () => {
      const input = document.getElementById('fileInput');
      if (!input.files.length) { uploadStatus.textContent = 'Pick a file first.'; return; }
      const form = new FormData();
      form.append('file', input.files[0]);
      const res = await fetch('/api/upload', { method: 'POST', body: form });
      const body = await res.json();
      uploadStatus.textContent = res.ok ? 'Uploaded ' + body.filename : body.error;
      refreshFiles();
    };

    document.getElementById('askBtn').onclick = async () => {
      const query = document.getElementById('query').value;
      output.textContent = 'Working...';
      resultTitle.textContent = '';
      if (document.getElementById('webSearch').checked) {
        const res = await fetch('/api/web-search', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ query })
        });
        const body = await res.json();
        resultTitle.textContent = body.title || '';
        output.textContent = res.ok ? body.result : body.error;
        return;
      }
      const files = Array.from(document.querySelectorAll('.file-check:checked')).map(c => c.value);
      const res = await fetch('/api/analyze', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ query, files })
      });
      const body = await res.json();
      resultTitle.textContent = body.title || '';
      output.textContent = res.ok ? body.result : body.error;
    };

    refreshFiles();
  </script>
</body>
</html>"#)
}
